use cipherforge::corpus::{Corpus, CorpusLine};
use cipherforge::reducer::{reduce, reduce_corpus, to_corpus, ReducedLine};

fn lines(rows: &[(&str, &str)]) -> Vec<CorpusLine> {
    rows.iter().map(|&(s, t)| CorpusLine::new(t, s)).collect()
}

fn texts(reduced: &[ReducedLine]) -> Vec<String> {
    reduced.iter().map(|l| l.text.clone()).collect()
}

#[test]
fn test_rotations_and_fragments_collapse() {
    let input = lines(&[
        ("s1", "ABCD"),
        ("s2", "CDAB"),
        ("s3", "BC"),
        ("s4", "XY"),
    ]);
    let out = reduce(&input);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].text, "ABCD");
    assert_eq!(out[0].sources, vec!["s1", "s2", "s3"]);
    assert_eq!(out[1].text, "XY");
    assert_eq!(out[1].sources, vec!["s4"]);
}

#[test]
fn test_wraparound_fragment_is_absorbed() {
    // "DA" only exists across the end of the ring
    let out = reduce(&lines(&[("ring", "ABCD"), ("frag", "DAB")]));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].sources, vec!["ring", "frag"]);
}

#[test]
fn test_longest_line_wins_regardless_of_position() {
    let out = reduce(&lines(&[("short", "BC"), ("long", "ABCD")]));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].text, "ABCD");
    assert_eq!(out[0].sources, vec!["long", "short"]);
}

#[test]
fn test_equal_length_ties_keep_the_earlier_line() {
    let out = reduce(&lines(&[("first", "ABC"), ("second", "BCA")]));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].text, "ABC");
    assert_eq!(out[0].sources, vec!["first", "second"]);
}

#[test]
fn test_reduction_is_idempotent() {
    let corpus = Corpus::new(lines(&[
        ("a", "NDSB"),
        ("b", "SBND"),
        ("c", "LHMR"),
        ("d", "MR"),
        ("e", "JCWU"),
        ("f", "UJ"),
    ]));
    let once = reduce_corpus(&corpus);
    let again = reduce_corpus(&to_corpus(&once));

    assert_eq!(texts(&once), texts(&again));
    assert!(again.iter().all(|l| l.sources.len() == 1));
}

#[test]
fn test_empty_input() {
    assert!(reduce(&[]).is_empty());
}
