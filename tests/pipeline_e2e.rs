// tests/pipeline_e2e.rs
use std::fs;
use std::path::{Path, PathBuf};

use datsemshift::config::options::PipelineOptions;
use datsemshift::config::overrides::GlottocodePolicy;
use datsemshift::csv::{parse_rows, Delim};
use datsemshift::pipeline::{self, SkipKind};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("datsemshift_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn shift_page(source: &str, arrow: &str, target: &str, realizations: &str) -> String {
    format!(
        r#"<html><body>
        <div class="shift__header">
          <span class="shift__header_item">{source}</span>
          <span class="shift__header_item">{arrow}</span>
          <span class="shift__header_item">{target}</span>
          <span class="realization_number">1 realization</span>
        </div>
        {realizations}
        </body></html>"#
    )
}

const GLAZ: &str = r#"<table class="realization__table">
    <tr><th><span>Accepted</span> Realization 1</th></tr>
    <tr><td colspan="2">Type</td><td>Polysemy</td></tr>
    <tr><td colspan="2">Language</td><td>Russian</td></tr>
    <tr><td colspan="2">Lexeme</td><td>glaz</td></tr>
    <tr><td>Meaning 1</td><td>eye</td><td></td></tr>
    <tr><td>Meaning 2</td><td>to see</td><td></td></tr>
    <tr><td>Direction</td><td>→</td><td></td></tr>
</table>"#;

const AURIS: &str = r#"<table class="realization__table">
    <tr><th>Realization 1</th></tr>
    <tr><td colspan="2">Type</td><td>Derivation</td></tr>
    <tr><td colspan="2">Language 1</td><td>Latin</td></tr>
    <tr><td colspan="2">Language 2</td><td>French</td></tr>
    <tr><td colspan="2">Lexeme 1</td><td>auris</td></tr>
    <tr><td colspan="2">Lexeme 2</td><td>ouïr</td></tr>
    <tr><td>Meaning 1</td><td>ear</td><td></td></tr>
    <tr><td>Meaning 2</td><td>to hear</td><td></td></tr>
    <tr><td>Direction</td><td>?</td><td></td></tr>
</table>"#;

/// languages, two concept pages, three shift pages (one broken) and a stray file.
fn seed_input(root: &Path) {
    write(
        &root.join("languages.html"),
        r#"<table>
          <tr><th>ID</th><th>Name</th></tr>
          <tr><td>1</td><td>Russian</td><td>-</td><td>Indo-European</td><td>Slavic</td><td>120</td></tr>
          <tr><td>2</td><td>Latin</td><td>latn</td><td>Indo-European</td><td>Italic</td><td>0</td></tr>
        </table>"#,
    );
    write(
        &root.join("datsemshift-concepts/a.html"),
        r#"<table><tr><td>eye</td><td>organ of sight</td><td></td><td>Body</td></tr>
           <tr><td>see</td><td>perceive</td><td></td><td>Perception</td></tr></table>"#,
    );
    write(
        &root.join("datsemshift-concepts/b.html"),
        r#"<table><tr><td>ear</td><td>organ of hearing</td><td></td><td>Body</td></tr></table>"#,
    );
    write(&root.join("datsemshift-data/shift0002.html"), &shift_page("ear", "?", "hear", AURIS));
    write(&root.join("datsemshift-data/shift0001.html"), &shift_page("eye", "→", "see", GLAZ));
    write(&root.join("datsemshift-data/shift0003.html"), "<html>no header here</html>");
    write(&root.join("datsemshift-data/notes.txt"), "not a page");
}

fn read_table(path: &Path) -> Vec<Vec<String>> {
    parse_rows(&fs::read_to_string(path).unwrap(), '\t')
}

fn options(name: &str) -> PipelineOptions {
    let root = tmp_dir(name);
    let input = root.join("in");
    seed_input(&input);
    PipelineOptions {
        input_dir: input,
        output_dir: root.join("out"),
        format: Delim::Tsv,
        glottocode_policy: GlottocodePolicy::Review,
        ..PipelineOptions::default()
    }
}

#[test]
fn writes_every_table_from_an_input_tree() {
    let opts = options("full");
    let summary = pipeline::run(&opts, None).unwrap();

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.records, 2);
    assert_eq!(summary.files_written.len(), 6);
    assert_eq!(summary.skips.len(), 1);
    assert_eq!(summary.skips[0].kind, SkipKind::Page);
    assert_eq!(summary.skips[0].page, "shift0003");
    assert_eq!(summary.review, vec![(2, String::from("latn"))]);
    assert_eq!(summary.violations, 0);

    // pages are read in file-name order, so shift0001 owns record 1
    let lexemes = read_table(&opts.out_path("lexemes"));
    assert_eq!(lexemes.len(), 3);
    assert_eq!(lexemes[0].len(), 18);
    assert_eq!(lexemes[1][0], "1");
    assert_eq!(lexemes[1][1], "shift0001");
    assert_eq!(lexemes[1][16], "glaz");
    assert_eq!(lexemes[2][1], "shift0002");
    assert_eq!(lexemes[2][12], "French");

    let languages = read_table(&opts.out_path("languages"));
    assert_eq!(languages[0], ["ID", "Name", "Glottocode", "Family", "SubGroup", "Words"]);
    // placeholder code blanked, unlisted one kept for review
    assert_eq!(languages[1][2], "");
    assert_eq!(languages[2][2], "latn");
    // French was created by the shift page; Latin's zero gets backfilled too
    assert_eq!(languages[3][..2], ["3", "French"]);
    assert_eq!(languages[3][5], "1");
    assert_eq!(languages[2][5], "1");

    let concepts = read_table(&opts.out_path("concepts"));
    let names: Vec<&str> = concepts[1..].iter().map(|r| r[1].as_str()).collect();
    assert_eq!(names, ["eye", "see", "ear", "hear"]);

    let shifts = read_table(&opts.out_path("shifts"));
    assert_eq!(shifts.len(), 3);
    assert_eq!(shifts[1][..4], ["shift0001", "eye", "1", "→"]);
}

#[test]
fn parameters_carry_json_adjacency() {
    let opts = options("params");
    pipeline::run(&opts, None).unwrap();

    let params = read_table(&opts.out_path("parameters"));
    let eye = params.iter().find(|r| r[1] == "eye").unwrap();
    let targets: serde_json::Value = serde_json::from_str(&eye[6]).unwrap();
    assert_eq!(targets[0]["NAME"], "see");
    assert_eq!(targets[0]["Polysemy"], 1);
    assert_eq!(targets[0]["Polysemy_Lexemes"][0], 1);

    let ear = params.iter().find(|r| r[1] == "ear").unwrap();
    let linked: serde_json::Value = serde_json::from_str(&ear[7]).unwrap();
    assert_eq!(linked[0]["NAME"], "hear");
    assert_eq!(linked[0]["Derivation"], 1);

    let pairs = read_table(&opts.out_path("concept-pairs"));
    let row = |r: [&str; 5]| r.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    assert!(pairs.contains(&row(["eye", "see", "0", "1", "0"])));
    assert!(pairs.contains(&row(["hear", "ear", "0", "0", "1"])));
}

#[test]
fn mapping_file_adds_concepts_mapped() {
    let mut opts = options("mapped");
    let mapping = opts.output_dir.with_file_name("map.tsv");
    write(&mapping, "ENGLISH\tCONCEPTICON_ID\tCONCEPTICON_GLOSS\neye\t1248\tEYE\n");
    opts.mapping_file = Some(mapping);
    opts.format = Delim::Csv;

    let summary = pipeline::run(&opts, None).unwrap();
    assert_eq!(summary.files_written.len(), 7);

    let text = fs::read_to_string(opts.out_path("concepts-mapped")).unwrap();
    let rows = parse_rows(&text, ',');
    let headers = ["NUMBER", "ENGLISH", "CONCEPTICON_ID", "CONCEPTICON_GLOSS", "CERTAINTY"];
    assert_eq!(rows[0][..5], headers);
    assert_eq!(rows[1][..5], ["1", "eye", "1248", "EYE", "100"]);
    assert_eq!(rows[2][2], "");
}

#[test]
fn missing_language_page_is_an_input_error() {
    let root = tmp_dir("missing");
    let opts = PipelineOptions {
        input_dir: root.join("nothing"),
        output_dir: root.join("out"),
        ..PipelineOptions::default()
    };
    let err = pipeline::run(&opts, None).unwrap_err();
    assert!(err.to_string().contains("languages.html"));
}
