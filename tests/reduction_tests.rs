use cipherforge::alphabet::Alphabet;
use cipherforge::ngram::{Counting, NgramTable, Smoothing};
use cipherforge::reduction::{parse_classes, partitions_into_sizes, ClassReduction, SymbolClass};
use rstest::rstest;

fn raw_bigrams(text: &str, symbols: &str) -> NgramTable {
    let counting = Counting::Smoothed(Smoothing {
        alphabet: Alphabet::parse(symbols).unwrap(),
        pseudo_count: 0.0,
    });
    NgramTable::build(text, 2, &counting).unwrap()
}

#[test]
fn test_partitions_enumerate_in_order() {
    let parts = partitions_into_sizes(&['a', 'b', 'c'], &[1, 2]).unwrap();
    assert_eq!(
        parts,
        vec![
            vec![vec!['a'], vec!['b', 'c']],
            vec![vec!['b'], vec!['a', 'c']],
            vec![vec!['c'], vec!['a', 'b']],
        ]
    );
}

#[rstest]
#[case(&[2, 1, 1], 12)]
#[case(&[4], 1)]
#[case(&[0, 4], 1)]
#[case(&[1, 1, 1, 1], 24)]
fn test_partition_counts(#[case] sizes: &[usize], #[case] expected: usize) {
    let parts = partitions_into_sizes(&[1, 2, 3, 4], sizes).unwrap();
    assert_eq!(parts.len(), expected);
    assert!(parts
        .iter()
        .all(|p| p.iter().map(Vec::len).sum::<usize>() == 4));
}

#[test]
fn test_partition_sizes_must_cover_the_elements() {
    assert!(partitions_into_sizes(&[1, 2, 3], &[1, 1]).is_err());
    assert!(partitions_into_sizes(&[1, 2, 3], &[]).is_err());
}

#[test]
fn test_parse_classes() {
    let classes = parse_classes("a=aeiou, k=ksmyrht,w=w").unwrap();
    assert_eq!(classes.len(), 3);
    assert_eq!(classes[1].label, 'k');
    assert_eq!(classes[1].members.len(), 7);
    assert_eq!(classes[0].to_string(), "a=aeiou");

    assert!(parse_classes("ab=c").is_err());
    assert!(parse_classes("a=x,a=y").is_err());
    assert!(parse_classes("novalue").is_err());
    assert!(parse_classes("").is_err());
}

#[test]
fn test_finds_the_alternating_split() {
    let classes = parse_classes("v=ai,c=kn").unwrap();
    let target = raw_bigrams("kanikanikani", "aikn");
    let reduction = ClassReduction::new(&classes, &target).unwrap();

    let source = Alphabet::parse("ABCD").unwrap();
    let source_bigrams = raw_bigrams("ABCDABCDCBAD", "ABCD");
    let out = reduction.search(&source, &source_bigrams).unwrap();

    assert_eq!(out.evaluated, 6);
    assert_eq!(
        out.classes,
        vec![
            SymbolClass {
                label: 'v',
                members: vec!['B', 'D'],
            },
            SymbolClass {
                label: 'c',
                members: vec!['A', 'C'],
            },
        ]
    );
    // identical class profiles: every label pair contributes exactly 2
    assert_eq!(out.error, 8.0);
}

#[test]
fn test_error_grows_with_mismatch() {
    let classes = parse_classes("v=ai,c=kn").unwrap();
    let target = raw_bigrams("kanikanikani", "aikn");
    let reduction = ClassReduction::new(&classes, &target).unwrap();
    let source_bigrams = raw_bigrams("ABCDABCDCBAD", "ABCD");

    let good = parse_classes("v=BD,c=AC").unwrap();
    let bad = parse_classes("v=AB,c=CD").unwrap();
    assert!(reduction.error(&good, &source_bigrams) < reduction.error(&bad, &source_bigrams));
}

#[test]
fn test_target_table_must_be_bigrams() {
    let classes = parse_classes("v=a").unwrap();
    let unigrams = NgramTable::from_counts(1, [("a", 1.0)]);
    assert!(ClassReduction::new(&classes, &unigrams).is_err());
}
