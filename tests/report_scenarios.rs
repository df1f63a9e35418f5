//! End-to-end report scenarios through `produce_report` with an in-memory
//! directory.

mod common;

use common::{app, days_from_now, sp, NOW};
use owo_colors::OwoColorize;
use secret_expiry_reporter::report::{
    produce_report, Encoding, ObjectKind, ReportError, ReportMode, ReportRequest,
};
use secret_expiry_reporter::StaticDirectory;

const APP_ID: &str = "0b6c5a1e-2f3d-4c5b-8a9e-1f2d3c4b5a6e";
const SECRET_ID: &str = "6f1e2d3c-4b5a-6978-8a9b-0c1d2e3f4a5b";

fn request(mode: ReportMode, window_days: i64, encoding: Encoding) -> ReportRequest {
    ReportRequest {
        mode,
        window_days,
        encoding,
        highlight: true,
    }
}

async fn run(
    directory: &StaticDirectory,
    request: ReportRequest,
) -> (Result<usize, ReportError>, String) {
    let mut out = Vec::new();
    let result = produce_report(directory, request, NOW, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

fn data_lines(output: &str) -> Vec<&str> {
    output.lines().skip(1).collect()
}

#[tokio::test]
async fn expired_secret_is_reported_and_highlighted() {
    let directory = StaticDirectory::new(
        vec![app("My App", APP_ID, &[(SECRET_ID, "2020-01-01T00:00:00Z")])],
        vec![],
    );

    let (result, out) = run(&directory, request(ReportMode::Apps, -1, Encoding::Text)).await;

    assert_eq!(result.unwrap(), 1);
    let lines = data_lines(&out);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("App    My App "));
    assert!(lines[0].contains(APP_ID));
    assert!(lines[0].ends_with(&"2020-01-01 00:00".red().to_string()));
}

#[tokio::test]
async fn secret_beyond_window_is_excluded() {
    let expiry = days_from_now(45);
    let directory = StaticDirectory::new(vec![app("My App", APP_ID, &[(SECRET_ID, &expiry)])], vec![]);

    let (result, out) = run(&directory, request(ReportMode::Apps, 30, Encoding::Text)).await;

    assert_eq!(result.unwrap(), 0);
    assert_eq!(out.lines().count(), 1, "header only");
    assert!(out.starts_with("OBJ    DISPLAY_NAME"));
}

#[tokio::test]
async fn secret_inside_window_is_included_without_highlight() {
    let expiry = days_from_now(45);
    let directory = StaticDirectory::new(vec![app("My App", APP_ID, &[(SECRET_ID, &expiry)])], vec![]);

    let (result, out) = run(&directory, request(ReportMode::Apps, 60, Encoding::Text)).await;

    assert_eq!(result.unwrap(), 1);
    let lines = data_lines(&out);
    assert!(!lines[0].contains('\x1b'));
    assert!(lines[0].ends_with(" 2023-12-29 22:13"));
}

#[tokio::test]
async fn objects_without_secrets_produce_no_rows() {
    let directory = StaticDirectory::new(
        vec![app("No Secrets", APP_ID, &[])],
        vec![sp("No Secrets SP", APP_ID, &[])],
    );

    let (result, out) = run(&directory, request(ReportMode::Combined, -1, Encoding::Csv)).await;

    assert_eq!(result.unwrap(), 0);
    assert_eq!(out, "\"OBJ\",\"DISPLAY_NAME\",\"APP_ID\",\"SECRET_ID\",\"EXPIRY_DATE_TIME\"\n");
}

#[tokio::test]
async fn csv_line_is_fully_quoted_and_uncolored() {
    let directory = StaticDirectory::new(
        vec![app("My App", APP_ID, &[(SECRET_ID, "2020-01-01T00:00:00Z")])],
        vec![],
    );

    let (result, out) = run(&directory, request(ReportMode::Apps, -1, Encoding::Csv)).await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(
        data_lines(&out),
        [format!(r#""App","My App","{APP_ID}","{SECRET_ID}","2020-01-01 00:00""#)]
    );
}

#[tokio::test]
async fn malformed_timestamp_aborts_without_output() {
    let directory = StaticDirectory::new(
        vec![
            app("Good App", APP_ID, &[(SECRET_ID, "2030-01-01T00:00:00Z")]),
            app("Bad App", "bad-app-id", &[("bad-secret", "not-a-date")]),
        ],
        vec![],
    );

    let (result, out) = run(&directory, request(ReportMode::Apps, -1, Encoding::Text)).await;

    match result.unwrap_err() {
        ReportError::MalformedTimestamp {
            display_name,
            app_id,
            secret_id,
            raw,
            ..
        } => {
            assert_eq!(display_name, "Bad App");
            assert_eq!(app_id, "bad-app-id");
            assert_eq!(secret_id, "bad-secret");
            assert_eq!(raw, "not-a-date");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(out.is_empty(), "nothing, not even the header, is written");
}

#[tokio::test]
async fn invalid_window_is_rejected_before_fetching() {
    let directory = StaticDirectory::new(vec![app("My App", APP_ID, &[])], vec![]);

    let (result, out) = run(&directory, request(ReportMode::Combined, -2, Encoding::Text)).await;

    assert!(matches!(result, Err(ReportError::InvalidWindow(-2))));
    assert_eq!(directory.fetch_count(), 0);
    assert!(out.is_empty());
}

#[tokio::test]
async fn directory_failure_aborts_without_output() {
    let directory = StaticDirectory::new(
        vec![app("My App", APP_ID, &[(SECRET_ID, "2020-01-01T00:00:00Z")])],
        vec![],
    )
    .failing_service_principals("403 Authorization_RequestDenied");

    let (result, out) = run(&directory, request(ReportMode::Combined, -1, Encoding::Text)).await;

    match result.unwrap_err() {
        ReportError::DirectoryUnavailable { kind, source } => {
            assert_eq!(kind, ObjectKind::ServicePrincipal);
            assert!(source.to_string().contains("Authorization_RequestDenied"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(out.is_empty());
}

#[tokio::test]
async fn combined_lists_applications_before_service_principals() {
    let directory = StaticDirectory::new(
        vec![app("Zeta App", APP_ID, &[("a-1", "2031-01-01T00:00:00Z")])],
        vec![sp("Alpha SP", APP_ID, &[("s-1", "2020-06-30T12:45:00+02:00")])],
    );

    let (result, out) = run(&directory, request(ReportMode::Combined, -1, Encoding::Csv)).await;

    assert_eq!(result.unwrap(), 2);
    let lines = data_lines(&out);
    assert!(lines[0].starts_with(r#""App","Zeta App""#));
    assert!(lines[1].starts_with(r#""SP","Alpha SP""#));
    assert!(lines[1].ends_with(r#""2020-06-30 12:45""#));
}

#[tokio::test]
async fn expired_secrets_ignore_the_window() {
    let expired = days_from_now(-400);
    let directory = StaticDirectory::new(
        vec![],
        vec![sp("Old SP", APP_ID, &[(SECRET_ID, &expired)])],
    );

    let (result, _) = run(&directory, request(ReportMode::ServicePrincipals, 0, Encoding::Csv)).await;

    assert_eq!(result.unwrap(), 1);
}
