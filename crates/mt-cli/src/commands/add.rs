//! Add command for creating time entries.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use mt_api::{Client, NewTimeEntry};
use mt_core::{TimeEntry, format_duration, parse_date, parse_duration};

use super::util;
use crate::AddArgs;

/// Validates the arguments and resolves project/service names.
///
/// Duration and date are checked before any network call.
pub fn build_entry(client: &Client, args: &AddArgs) -> Result<NewTimeEntry> {
    let minutes = parse_duration(&args.duration)?;
    let date = args.date.as_deref().map(parse_date).transpose()?;

    let project_id = args
        .project
        .as_deref()
        .map(|project| util::project_id(client, project))
        .transpose()?;
    let service_id = args
        .service
        .as_deref()
        .map(|service| util::service_id(client, service))
        .transpose()?;

    Ok(NewTimeEntry {
        minutes,
        note: args.note.clone(),
        date,
        project_id,
        service_id,
    })
}

/// Formats the confirmation for a created entry.
pub fn format_created(entry: &TimeEntry) -> String {
    let mut output = String::new();
    writeln!(output, "✓ Time entry created successfully!").unwrap();
    writeln!(output, "  Date: {}", entry.date_label()).unwrap();
    writeln!(
        output,
        "  Duration: {} ({} minutes)",
        format_duration(entry.minutes),
        entry.minutes
    )
    .unwrap();
    writeln!(output, "  Note: {}", entry.note).unwrap();
    if let Some(project) = &entry.project {
        writeln!(output, "  Project: {project}").unwrap();
    }
    if let Some(service) = &entry.service {
        writeln!(output, "  Service: {service}").unwrap();
    }
    output
}

/// Runs the add command.
pub fn run<W: Write>(writer: &mut W, client: &Client, args: &AddArgs) -> Result<()> {
    let entry = build_entry(client, args)?;
    let created = client
        .create_time_entry(&entry)
        .context("failed to create time entry")?;
    write!(writer, "{}", format_created(&created))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use insta::assert_snapshot;
    use mt_core::ValidationError;
    use serde_json::json;

    fn args(duration: &str) -> AddArgs {
        AddArgs {
            duration: duration.to_string(),
            note: "Bug fixing".to_string(),
            date: None,
            project: None,
            service: None,
        }
    }

    /// A client pointed at a closed port; any request would fail.
    fn offline_client() -> Client {
        Client::with_base_url("http://127.0.0.1:9", "key").unwrap()
    }

    #[test]
    fn invalid_duration_fails_before_network() {
        let err = build_entry(&offline_client(), &args("abc")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn invalid_date_fails_before_network() {
        let mut args = args("1h");
        args.date = Some("15.01.2025".to_string());
        let err = build_entry(&offline_client(), &args).unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn numeric_ids_need_no_lookup() {
        let mut args = args("1h30m");
        args.date = Some("2025-01-15".to_string());
        args.project = Some("12".to_string());
        args.service = Some("3".to_string());

        let entry = build_entry(&offline_client(), &args).unwrap();
        assert_eq!(
            entry,
            NewTimeEntry {
                minutes: 90,
                note: "Bug fixing".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 1, 15),
                project_id: Some(12),
                service_id: Some(3),
            }
        );
    }

    #[test]
    fn format_created_entry() {
        let entry = TimeEntry {
            date: NaiveDate::from_ymd_opt(2025, 1, 15),
            minutes: 90,
            note: "Bug fixing".to_string(),
            project: Some("Acme Corp".to_string()),
            service: None,
        };
        assert_snapshot!(format_created(&entry), @r"
        ✓ Time entry created successfully!
          Date: 2025-01-15
          Duration: 1h 30m (90 minutes)
          Note: Bug fixing
          Project: Acme Corp
        ");
    }

    #[test]
    fn add_resolves_project_name_then_creates() {
        let server = MockServer::start();
        let projects = server.mock(|when, then| {
            when.method(GET).path("/projects.json");
            then.status(200).json_body(json!([
                {"project": {"id": 1, "name": "Acme Corp"}},
                {"project": {"id": 2, "name": "Acme Inc"}}
            ]));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/time_entries.json")
                .json_body(json!({"time_entry": {"minutes": 120, "note": "Bug fixing", "project_id": 2}}));
            then.status(201).json_body(json!({"time_entry": {
                "date_at": "2025-01-15",
                "minutes": 120,
                "note": "Bug fixing",
                "project_name": "Acme Inc"
            }}));
        });
        let client = Client::with_base_url(server.base_url(), "key").unwrap();

        let mut args = args("2h");
        args.project = Some("acme inc".to_string());
        let mut output = Vec::new();
        run(&mut output, &client, &args).unwrap();

        projects.assert();
        create.assert();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Duration: 2h (120 minutes)"));
        assert!(output.contains("Project: Acme Inc"));
    }

    #[test]
    fn add_with_unknown_project_does_not_create() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/projects.json");
            then.status(200)
                .json_body(json!([{"project": {"id": 1, "name": "Acme Corp"}}]));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/time_entries.json");
            then.status(201).json_body(json!({"time_entry": {}}));
        });
        let client = Client::with_base_url(server.base_url(), "key").unwrap();

        let mut args = args("2h");
        args.project = Some("globex".to_string());
        let err = run(&mut Vec::new(), &client, &args).unwrap_err();

        create.assert_hits(0);
        assert!(err.to_string().contains("No project found matching 'globex'"));
    }
}
