//! End-to-end runs of the three analyses against small CSV fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use tabstat_cli::analysis::{
    FunnelOptions, InsuranceOptions, JeopardyOptions, RESULTS_FILE, run_funnel, run_insurance,
    run_jeopardy,
};

fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn write_funnel(dir: &Path) {
    write_csv(
        dir,
        "visits.csv",
        "user_id,visit_time\n\
         u1,2017-01-01 10:00:00\n\
         u2,2017-01-02 11:00:00\n\
         u3,2017-01-03 12:00:00\n",
    );
    write_csv(
        dir,
        "cart.csv",
        "user_id,cart_time\n\
         u1,2017-01-01 10:05:00\n\
         u3,2017-01-03 12:10:00\n",
    );
    write_csv(
        dir,
        "checkout.csv",
        "user_id,checkout_time\n\
         u1,2017-01-01 10:20:00\n",
    );
    write_csv(
        dir,
        "purchase.csv",
        "user_id,purchase_time\n\
         u1,2017-01-01 10:30:00\n",
    );
}

#[test]
fn funnel_reports_drop_off_per_stage() {
    let dir = TempDir::new().unwrap();
    write_funnel(dir.path());

    let outcome = run_funnel(&FunnelOptions::new(dir.path())).unwrap();

    let visits_cart = &outcome.pairwise[0];
    assert_eq!(visits_cart.nulls.total_rows, 3);
    assert_eq!(visits_cart.nulls.nulls, 1);
    assert_eq!(format!("{:.2}", visits_cart.percentage().unwrap()), "33.33");
    assert_eq!(outcome.pairwise[1].percentage(), Some(50.0));
    assert_eq!(outcome.pairwise[2].percentage(), Some(0.0));

    assert_eq!(outcome.combined_rows, 3);
    let nulls: Vec<usize> = outcome.combined.iter().map(|d| d.nulls.nulls).collect();
    assert_eq!(nulls, vec![1, 2, 2]);
    let highest = outcome.highest.unwrap();
    assert_eq!((highest.from.as_str(), highest.to.as_str()), ("cart", "checkout"));
    assert_eq!(outcome.average_seconds, Some(1800.0));

    let text = outcome.report.render();
    assert!(text.contains("- Merged visits and cart\n"));
    assert!(text.contains("Drop-off: 33.33%"));
    assert!(text.contains("Highest drop-off: 66.67% between cart and checkout"));
    assert!(text.contains("Average time to complete: 0 days 00:30:00"));
}

#[test]
fn funnel_without_purchases_has_undefined_average() {
    let dir = TempDir::new().unwrap();
    write_funnel(dir.path());
    write_csv(dir.path(), "purchase.csv", "user_id,purchase_time\n");

    let outcome = run_funnel(&FunnelOptions::new(dir.path())).unwrap();

    assert_eq!(outcome.average_seconds, None);
    assert!(
        outcome
            .report
            .render()
            .contains("Average time to complete: n/a")
    );
}

#[test]
fn funnel_missing_stage_file_fails() {
    let dir = TempDir::new().unwrap();
    write_funnel(dir.path());
    fs::remove_file(dir.path().join("checkout.csv")).unwrap();

    let err = run_funnel(&FunnelOptions::new(dir.path())).unwrap_err();
    assert!(format!("{err:#}").contains("load checkout stage"));
}

const INSURANCE_CSV: &str = "age,sex,bmi,children,smoker,region,charges\n\
    19,female,27.9,0,yes,southwest,1000\n\
    18,male,33.77,1,no,southeast,200\n\
    28,male,33,1,yes,southeast,1400\n\
    33,male,22.705,0,no,northwest,300\n\
    40,female,28.88,2,no,northwest,600\n\
    50,female,30,,no,northwest,999\n\
    45,male,31,zero,no,northwest,999\n";

#[test]
fn insurance_breakdown_and_results_file() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "insurance.csv", INSURANCE_CSV);

    let outcome = run_insurance(&InsuranceOptions::new(&path)).unwrap();

    assert_eq!(outcome.load.rows_read, 7);
    assert_eq!(outcome.load.dropped_missing, 1);
    assert_eq!(outcome.load.dropped_uncoercible, 1);
    assert_eq!(outcome.load.rows_kept, 5);

    assert_eq!(outcome.by_children.keys(), vec!["0", "1", "2"]);
    assert_eq!(outcome.by_children.get("0").unwrap().sum, 1300.0);
    assert_eq!(outcome.changes[1].diff_prev, Some(150.0));
    assert_eq!(outcome.changes[2].pct_change, Some(-25.0));

    assert_eq!(outcome.by_sex.total_diff(), Some(300.0));
    assert_eq!(outcome.by_smoker.total_diff(), Some(1300.0));

    assert_eq!(outcome.results_path, dir.path().join(RESULTS_FILE));
    let mut console = Vec::new();
    outcome
        .report
        .emit_to(&mut console, Some(&outcome.results_path))
        .unwrap();
    let saved = fs::read_to_string(&outcome.results_path).unwrap();
    assert_eq!(saved.as_bytes(), console.as_slice());

    let titles: Vec<&str> = outcome.report.sections().iter().map(|s| s.title()).collect();
    assert_eq!(
        titles,
        vec![
            "Age Analysis",
            "Overall Insurance Costs Totals and Averages",
            "Insurance Cost Analysis by Sex",
            "Insurance Cost Analysis by Smokers and Non-Smokers",
            "Insurance Cost Analysis by Number of Children",
        ]
    );
    assert!(saved.contains("Total number of patients: 5"));
    assert!(saved.contains("Patient ages range from: 18 - 40"));
    assert!(saved.contains("Total amount spent on insurance: $3500.00"));
    assert!(saved.contains("Difference of average costs between males and females: -$166.67"));
    assert!(saved.contains("Weighted average cost: $700.00"));
    assert!(saved.contains("Difference in number of males and females: 1"));
    assert!(saved.contains("Ratio of males to females: 1.50"));
    assert!(saved.contains("Ratio of smokers to non-smokers: 0.67"));
}

#[test]
fn insurance_padded_categories_count_consistently() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "insurance.csv",
        "age,sex,bmi,children,smoker,region,charges\n\
         19, female,27.9,0, yes,southwest,1000\n\
         18, male,33.77,1, no,southeast,200\n\
         28,male ,33,1,yes,southeast,1400\n",
    );

    let outcome = run_insurance(&InsuranceOptions::new(&path)).unwrap();

    let males = outcome.by_sex.left_stats.as_ref().map(|stats| stats.rows);
    let smokers = outcome.by_smoker.left_stats.as_ref().map(|stats| stats.rows);
    assert_eq!(males, Some(2));
    assert_eq!(smokers, Some(2));
    let text = outcome.report.render();
    assert!(text.contains("There are 2 male patients."));
    assert!(text.contains("1 of those males are smokers"));
    assert!(text.contains("Ratio of males to females: 2.00"));
}

#[test]
fn insurance_missing_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "insurance.csv", "age,sex,charges\n19,female,10\n");

    let err = run_insurance(&InsuranceOptions::new(&path)).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("missing required columns"));
    assert!(message.contains("children"));
}

const JEOPARDY_CSV: &str = "Show Number, Air Date, Round, Category, Value, Question, Answer\n\
    4680,2004-12-31,Jeopardy!,HISTORY,$200,This king of England signed the Magna Carta,John\n\
    4680,2004-12-31,Jeopardy!,HISTORY,\"$1,000\",The king of England in 1066,Harold\n\
    5957,2010-07-06,Double Jeopardy!,ROYALTY,no value,Kingdom of England ruler,Anne\n\
    5957,2010-07-06,Final Jeopardy!,KINGS,$400,A king of England and Scotland,John\n\
    3751,2000-12-18,Jeopardy!,MONARCHS,$600,A king of France,Louis\n";

#[test]
fn jeopardy_keyword_report() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "jeopardy.csv", JEOPARDY_CSV);

    let outcome = run_jeopardy(&JeopardyOptions::new(&path)).unwrap();

    assert_eq!(outcome.matched, 3);
    assert_eq!(outcome.answers[0], ("John".to_string(), 2));
    insta::assert_snapshot!(outcome.report.render(), @r"
    - Dataset
    Questions loaded: 5
    Rows excluded for unreadable values: 0

    - Questions containing King, England
    Matching questions: 3
    +---------------------------------------------+--------+--------+
    | Question                                    | Value  | Answer |
    +===============================================================+
    | This king of England signed the Magna Carta | $200   | John   |
    | The king of England in 1066                 | $1,000 | Harold |
    | A king of England and Scotland              | $400   | John   |
    +---------------------------------------------+--------+--------+

    - Average value
    Average value of questions containing King, England: $533.33

    - Top 5 answers
    +--------+-------------+
    | Answer | Occurrences |
    +======================+
    | John   |           2 |
    | Harold |           1 |
    +--------+-------------+
    Most common answer: 'John' with 2 occurrences
    ");
}

#[test]
fn jeopardy_without_matches_renders_placeholders() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "jeopardy.csv", JEOPARDY_CSV);
    let options = JeopardyOptions {
        words: vec!["Pharaoh".to_string()],
        ..JeopardyOptions::new(&path)
    };

    let outcome = run_jeopardy(&options).unwrap();

    assert_eq!(outcome.matched, 0);
    assert_eq!(outcome.average_value, None);
    let text = outcome.report.render();
    assert!(text.contains("Average value of questions containing Pharaoh: n/a"));
    assert!(text.contains("Most common answer: n/a"));
}
