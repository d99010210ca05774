use cipherforge::alphabet::Alphabet;
use cipherforge::config::ClassifyThresholds;
use cipherforge::ngram::classify::{Classifier, Flag};
use cipherforge::ngram::NgramTable;
use rstest::rstest;

fn models() -> (NgramTable, NgramTable) {
    let uniform = NgramTable::uniform(&Alphabet::parse("ab").unwrap(), 1.0).unwrap();
    let corpus = NgramTable::from_counts(1, [("a", 9.0), ("b", 1.0)]);
    (uniform, corpus)
}

#[rstest]
#[case("aaaa", Flag::Exemplar)]
#[case("bbbb", Flag::Rejected)]
#[case("ab", Flag::Neutral)]
fn test_flags(#[case] line: &str, #[case] expected: Flag) {
    let (uniform, corpus) = models();
    let classifier = Classifier::new(&uniform, &corpus, ClassifyThresholds::default()).unwrap();
    assert_eq!(classifier.classify(line).unwrap().flag, expected);
}

#[test]
fn test_exemplar_strength_is_the_inverse_ratio() {
    let (uniform, corpus) = models();
    let classifier = Classifier::new(&uniform, &corpus, ClassifyThresholds::default()).unwrap();
    let score = classifier.classify("aaaa").unwrap();

    let expected_ratio = (0.5f64 / 0.9).powi(4);
    assert!((score.ratio - expected_ratio).abs() < 1e-9);
    assert!((score.strength - 1.0 / expected_ratio).abs() < 1e-9);
    assert!(score.log_ratio < 0.0);
}

#[rstest]
#[case('a', Flag::Exemplar)]
#[case('b', Flag::Rejected)]
fn test_long_lines_keep_their_flag(#[case] symbol: char, #[case] expected: Flag) {
    let (uniform, corpus) = models();
    let classifier = Classifier::new(&uniform, &corpus, ClassifyThresholds::default()).unwrap();
    let line: String = std::iter::repeat(symbol).take(5_000).collect();
    let score = classifier.classify(&line).unwrap();

    assert_eq!(score.flag, expected);
    assert!(score.log_ratio.is_finite());
    assert!(score.log_ratio.abs() > 700.0);
}

#[test]
fn test_non_positive_thresholds_are_rejected() {
    let (uniform, corpus) = models();
    let zero = ClassifyThresholds {
        reject_above: 10.0,
        exemplar_below: 0.0,
    };
    assert!(Classifier::new(&uniform, &corpus, zero).is_err());
}

#[test]
fn test_unknown_symbols_do_not_move_the_ratio() {
    let (uniform, corpus) = models();
    let classifier = Classifier::new(&uniform, &corpus, ClassifyThresholds::default()).unwrap();
    let plain = classifier.classify("ab").unwrap();
    let noisy = classifier.classify("a--b??").unwrap();
    assert!((plain.log_ratio - noisy.log_ratio).abs() < 1e-12);
}

#[test]
fn test_custom_thresholds() {
    let (uniform, corpus) = models();
    let strict = ClassifyThresholds {
        reject_above: 2.0,
        exemplar_below: 0.5,
    };
    let classifier = Classifier::new(&uniform, &corpus, strict).unwrap();
    assert_eq!(classifier.classify("ab").unwrap().flag, Flag::Rejected);
}

#[test]
fn test_crossed_thresholds_are_rejected() {
    let (uniform, corpus) = models();
    let crossed = ClassifyThresholds {
        reject_above: 1.0,
        exemplar_below: 10.0,
    };
    assert!(Classifier::new(&uniform, &corpus, crossed).is_err());
}

#[test]
fn test_flag_names() {
    assert_eq!(Flag::Rejected.to_string(), "rejected");
    assert_eq!("exemplar".parse::<Flag>().unwrap(), Flag::Exemplar);
}

#[test]
fn test_empty_corpus_model_fails() {
    let (uniform, _) = models();
    let empty = NgramTable::empty(1);
    let classifier = Classifier::new(&uniform, &empty, ClassifyThresholds::default()).unwrap();
    assert!(classifier.classify("ab").is_err());
}
