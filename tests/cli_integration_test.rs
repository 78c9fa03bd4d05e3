use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const LABELED: &str = indoc! {"
    user_id,user_name,user_followers_count,candidate,sentiment,score,likes,retweet_count,tweet,source,created_at
    a,Alice,1200,trump,positive,0.9,4,1,#MAGA rally tonight,Twitter for iPhone,2020-10-15 10:00:00
    b,Bob,300,biden,positive,0.8,2,0,#Biden2020 all the way,Twitter Web App,2020-10-15 11:00:00
    c,Carol,50,trump,positive,0.1,0,0,watching the debate,Twitter for Android,2020-10-16 09:30:00
"};

fn tweetalign(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tweetalign"))
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("TWEETALIGN_QUIET", "1")
        .args(args)
        .output()
        .expect("Failed to execute tweetalign")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("tweetalign exited with {}", output.status);
    }
}

#[test]
fn test_label_json_report_and_csv_outputs() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tweets.csv"), LABELED).unwrap();

    let output = tweetalign(
        temp.path(),
        &[
            "label",
            "tweets.csv",
            "--format",
            "json",
            "--output",
            "out/report.json",
            "--labeled-csv",
            "labeled.csv",
            "--users-csv",
            "users.csv",
            "--min-tweets",
            "1",
        ],
    );
    assert_success(&output);

    let report: Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("out/report.json")).unwrap())
            .unwrap();
    assert_eq!(report["total_tweets"], 3);
    assert_eq!(report["total_users"], 3);

    let low = report["thresholds"]["low"].as_f64().unwrap();
    let high = report["thresholds"]["high"].as_f64().unwrap();
    assert!((low + 0.08).abs() < 1e-9);
    assert!((high - 0.58).abs() < 1e-9);

    let sizes: Vec<(String, u64)> = report["camps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["camp"].as_str().unwrap().to_string(), c["users"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        sizes,
        vec![
            ("Biden".to_string(), 1),
            ("Trump".to_string(), 1),
            ("Neutral".to_string(), 1)
        ]
    );
    assert_eq!(report["temporal_volume"]["status"], "ready");
    assert_eq!(report["sources"]["status"], "ready");

    let labeled = fs::read_to_string(temp.path().join("labeled.csv")).unwrap();
    let camps: Vec<&str> = labeled
        .lines()
        .skip(1)
        .map(|line| line.rsplit(',').next().unwrap())
        .collect();
    assert_eq!(camps, vec!["Trump", "Biden", "Neutral"]);

    let users = fs::read_to_string(temp.path().join("users.csv")).unwrap();
    assert_eq!(users.lines().count(), 4);
}

#[test]
fn test_label_falls_back_to_default_input() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("Data")).unwrap();
    fs::write(temp.path().join("Data/tweets_with_sentiment.csv"), LABELED).unwrap();

    let output = tweetalign(temp.path(), &["label", "missing.csv", "--format", "json"]);
    assert_success(&output);

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_tweets"], 3);
}

#[test]
fn test_label_missing_input_names_both_paths() {
    let temp = TempDir::new().unwrap();

    let output = tweetalign(
        temp.path(),
        &["label", "missing.csv", "--fallback", "nowhere.csv"],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.csv"), "stderr: {stderr}");
    assert!(stderr.contains("nowhere.csv"), "stderr: {stderr}");
}

#[test]
fn test_label_markdown_reports_skipped_sections() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("tweets.csv"),
        indoc! {"
            user_id;candidate;sentiment;score
            a;trump;positive;0.9
            b;biden;negative;0.4
        "},
    )
    .unwrap();

    let output = tweetalign(temp.path(), &["label", "tweets.csv", "--format", "markdown"]);
    assert_success(&output);

    let markdown = String::from_utf8_lossy(&output.stdout);
    assert!(markdown.contains("no 'source' column"), "markdown: {markdown}");
    assert!(markdown.contains("_Skipped:"));
}

#[test]
fn test_config_file_sets_quantiles() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tweets.csv"), LABELED).unwrap();
    fs::write(
        temp.path().join(".tweetalign.toml"),
        indoc! {"
            [camps]
            low_quantile = 0.5
            high_quantile = 0.9
        "},
    )
    .unwrap();

    let output = tweetalign(temp.path(), &["label", "tweets.csv", "--format", "json"]);
    assert_success(&output);
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["thresholds"]["low_quantile"], 0.5);

    let output = tweetalign(
        temp.path(),
        &["label", "tweets.csv", "--format", "json", "--low-quantile", "0.2"],
    );
    assert_success(&output);
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["thresholds"]["low_quantile"], 0.2);
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tweets.csv"), LABELED).unwrap();

    let output = tweetalign(
        temp.path(),
        &["--config", "absent.toml", "label", "tweets.csv"],
    );
    assert!(!output.status.success());
}

#[test]
fn test_sentiment_annotates_input() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("raw.csv"),
        indoc! {"
            user_id,tweet
            1,What a great victory tonight
            2,RT @someone: corrupt liar
            3,Total disgrace and a disaster
        "},
    )
    .unwrap();

    let output = tweetalign(
        temp.path(),
        &[
            "sentiment",
            "raw.csv",
            "--output",
            "scored.csv",
            "--drop-retweets",
            "--no-parallel",
        ],
    );
    assert_success(&output);

    let scored = fs::read_to_string(temp.path().join("scored.csv")).unwrap();
    let mut lines = scored.lines();
    assert_eq!(lines.next().unwrap(), "user_id,tweet,sentiment,score");
    let labels: Vec<&str> = lines.map(|l| l.split(',').nth(2).unwrap()).collect();
    assert_eq!(labels, vec!["positive", "negative"]);
}

#[test]
fn test_compare_json() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("trump.csv"),
        "user_id,tweet,sentiment,score\n1,a,positive,0.9\n1,b,negative,0.5\n2,c,negative,0.7\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("biden.csv"),
        "user_id,tweet,sentiment,score\n3,d,neutral,0.6\n",
    )
    .unwrap();

    let output = tweetalign(
        temp.path(),
        &[
            "compare", "--trump", "trump.csv", "--biden", "biden.csv", "--sample", "10", "--seed",
            "1", "--format", "json",
        ],
    );
    assert_success(&output);

    let comparison: Value = serde_json::from_slice(&output.stdout).unwrap();
    let candidates = comparison["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 2);
    // one tweet per unique user after sampling
    assert_eq!(candidates[0]["tweets"], 2);
    assert_eq!(candidates[1]["tweets"], 1);
}

#[test]
fn test_geo_writes_html_map() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("trump.csv"),
        "user_id,state,country\n1,Texas,United States of America\n2,Bavaria,Germany\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("biden.csv"),
        "user_id,state,country\n3,Ohio,United States of America\n4,Ohio,United States of America\n",
    )
    .unwrap();

    let output = tweetalign(
        temp.path(),
        &[
            "geo",
            "--trump",
            "trump.csv",
            "--biden",
            "biden.csv",
            "--map",
            "map.html",
            "--format",
            "json",
        ],
    );
    assert_success(&output);

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["states"]["status"], "ready");
    let rows = report["dominance"]["data"]["rows"].as_array().unwrap();
    let countries: Vec<&str> = rows.iter().map(|r| r["country"].as_str().unwrap()).collect();
    assert_eq!(countries, vec!["Germany", "United States of America"]);

    let html = fs::read_to_string(temp.path().join("map.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Germany"));
}

#[test]
fn test_init_creates_config_once() {
    let temp = TempDir::new().unwrap();

    assert_success(&tweetalign(temp.path(), &["init"]));
    let written = fs::read_to_string(temp.path().join(".tweetalign.toml")).unwrap();
    assert!(written.contains("[camps]"));

    let again = tweetalign(temp.path(), &["init"]);
    assert!(!again.status.success());
    assert_success(&tweetalign(temp.path(), &["init", "--force"]));
}
