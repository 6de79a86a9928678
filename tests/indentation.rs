use ecf::ErrorKind;
use rstest::rstest;

#[derive(Debug, Default)]
struct Recipe {
    name: String,
    items: Vec<String>,
}

ecf::record! {
    Recipe { name, items }
}

#[derive(Debug, Default)]
struct Lists {
    hobbies: Vec<String>,
    chores: Vec<String>,
    teams: std::collections::BTreeMap<String, Vec<String>>,
    recipes: std::collections::BTreeMap<String, Recipe>,
    title: String,
}

ecf::record! {
    Lists { hobbies, chores, teams, recipes, title }
}

fn mismatch_line(input: &str) -> Option<usize> {
    let err = decode(input).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IndentationMismatch, "{err}");
    err.line()
}

fn decode(input: &str) -> ecf::Result<Lists> {
    ecf::from_str(input)
}

#[rstest]
#[case("Hobbies:\n  a\n  b\n", Some(vec!["a", "b"]))]
#[case("Hobbies:\n\ta\n\tb\n", Some(vec!["a", "b"]))]
#[case("Hobbies:\n \t a\n \t b\n", Some(vec!["a", "b"]))]
#[case("Hobbies:\n  a\n    b\n", None)]
#[case("Hobbies:\n    a\n  b\n", None)]
#[case("Hobbies:\n  a\n\tb\n", None)]
#[case("Hobbies:\n  a   spaced   item  \n", Some(vec!["a   spaced   item"]))]
#[case("Hobbies:\n", Some(vec![]))]
fn list_indentation(#[case] input: &str, #[case] expected: Option<Vec<&str>>) {
    match expected {
        Some(expected) => {
            let lists = decode(input).unwrap_or_else(|err| panic!("decode failed: {err}"));
            assert_eq!(lists.hobbies, expected);
        }
        None => {
            let err = decode(input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::IndentationMismatch);
            assert_eq!(err.line(), Some(3));
        }
    }
}

#[rstest]
fn signature_is_block_local() {
    let lists = decode("Hobbies:\n  a\n  b\nChores:\n\tdishes\n\tlaundry\n").unwrap();
    assert_eq!(lists.hobbies, ["a", "b"]);
    assert_eq!(lists.chores, ["dishes", "laundry"]);
}

#[rstest]
fn named_lists_track_their_own_signature() {
    let lists = decode("Teams: red\n  ann\n  bob\nTeams: blue\n    cy\n    di\n").unwrap();
    assert_eq!(lists.teams["red"], ["ann", "bob"]);
    assert_eq!(lists.teams["blue"], ["cy", "di"]);
}

#[rstest]
fn reopened_list_appends() {
    let lists = decode("Hobbies:\n  a\nTitle: x\nHobbies:\n  b\n").unwrap();
    assert_eq!(lists.hobbies, ["a", "b"]);
}

#[rstest]
#[case("Hobbies:\n  a\nTitle: x\nHobbies:\n    b\n", 5)]
#[case("Hobbies:\n  a\nChores:\n\tx\nHobbies:\n\tb\n", 6)]
#[case("Teams: red\n  ann\nTeams: blue\n\tcy\nTeams: red\n    bob\n", 6)]
fn reopened_list_keeps_first_signature(#[case] input: &str, #[case] line: usize) {
    assert_eq!(mismatch_line(input), Some(line));
}

#[rstest]
fn reopened_named_list_entry_appends() {
    let lists = decode("Teams: red\n  ann\nTeams: blue\n\tcy\nTeams: red\n  bob\n").unwrap();
    assert_eq!(lists.teams["red"], ["ann", "bob"]);
    assert_eq!(lists.teams["blue"], ["cy"]);
}

#[rstest]
#[case("Recipes: soup\n  a\n    b\n", 3)]
#[case("Recipes: soup\n\ta\n\tb\n  c\n", 4)]
fn block_items_follow_signature(#[case] input: &str, #[case] line: usize) {
    assert_eq!(mismatch_line(input), Some(line));
}

#[rstest]
fn redeclared_block_adopts_new_signature() {
    let lists = decode("Recipes: soup\n  a\nRecipes: soup\n\tb\n\tc\n").unwrap();
    assert_eq!(lists.recipes["soup"].items, ["b", "c"]);
}

#[rstest]
fn named_list_without_items_creates_no_entry() {
    let lists = decode("Teams: empty\nTitle: t\n").unwrap();
    assert!(lists.teams.is_empty());
    assert_eq!(lists.title, "t");
}

#[rstest]
fn unindented_line_closes_block() {
    let lists = decode("Hobbies:\n  a\nTitle: after\n").unwrap();
    assert_eq!(lists.hobbies, ["a"]);
    assert_eq!(lists.title, "after");
}

#[rstest]
fn unindented_non_key_line_is_syntax_error() {
    let err = decode("Hobbies:\n  a\nstray\n").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Syntax(_)));
    assert_eq!(err.line(), Some(3));
}

#[rstest]
fn indented_root_line_is_key_value() {
    let lists = decode("   Title: padded\n").unwrap();
    assert_eq!(lists.title, "padded");
}

#[rstest]
fn terminator_inside_block_stops() {
    let lists = decode("Hobbies:\n  a\n  ###\n  b\nTitle: never\n").unwrap();
    assert_eq!(lists.hobbies, ["a"]);
    assert!(lists.title.is_empty());
}
