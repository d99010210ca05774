use cipherforge::alphabet::Alphabet;
use cipherforge::phonetic::RomajiSimplifier;
use rstest::rstest;

#[rstest]
#[case("fuji", "husi")]
#[case("chawan", "tiyawan")]
#[case("shashin", "siyasin")]
#[case("jouzu", "siyousu")]
#[case("chikara", "tikara")]
#[case("tsunami", "tunami")]
#[case("daigaku", "taikaku")]
#[case("pan", "han")]
#[case("kyoto", "kiyoto")]
#[case("kitte", "kitute")]
#[case("obaasan", "ohasan")]
fn test_simplify(#[case] input: &str, #[case] expected: &str) {
    let simplifier = RomajiSimplifier::new().unwrap();
    assert_eq!(simplifier.simplify(input), expected);
}

#[test]
fn test_reference_normalisation() {
    let simplifier = RomajiSimplifier::new().unwrap();
    let target = Alphabet::parse("aiueoksthrmnyw").unwrap();

    // macrons decompose away; digits and punctuation are dropped
    let out = simplifier.normalize_reference("Tōkyō 2020, Fuji-san!", &target);
    assert_eq!(out, "tokiyohusisan");
    assert!(out.chars().all(|c| target.contains(c)));
}

#[test]
fn test_normalisation_drops_letters_outside_the_target() {
    let simplifier = RomajiSimplifier::new().unwrap();
    let target = Alphabet::parse("aiueoksthrmnyw").unwrap();
    assert_eq!(simplifier.normalize_reference("vlx", &target), "");
}
