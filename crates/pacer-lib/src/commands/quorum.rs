//! Quorum options in the transport configuration.

use crate::commands::{blob, CommandOutput};
use crate::env::LibraryEnvironment;
use crate::reports::{CommandResult, ReportItem, ReportList};
use crate::resource::ResourceKind;

/// Quorum options accepted by `set_options`.
const ALLOWED_OPTIONS: &[&str] = &[
    "auto_tie_breaker",
    "last_man_standing",
    "last_man_standing_window",
    "wait_for_all",
];

/// Return the current transport configuration.
pub fn get_config(env: &mut LibraryEnvironment) -> CommandResult<CommandOutput> {
    let conf = env.read_resource(ResourceKind::CorosyncConf)?;
    Ok(CommandOutput::Text(conf))
}

/// Set quorum options in the transport configuration.
///
/// Every option is validated before anything is written; a single invalid
/// option fails the whole call with one batch listing all problems.
pub fn set_options(
    env: &mut LibraryEnvironment,
    options: &[(String, String)],
) -> CommandResult<CommandOutput> {
    let mut reports = ReportList::new();
    if options.is_empty() {
        reports.push(ReportItem::error("NO_OPTIONS", "no quorum options given"));
    }
    for (name, _) in options {
        if !ALLOWED_OPTIONS.contains(&name.as_str()) {
            reports.push(ReportItem::error(
                "INVALID_QUORUM_OPTION",
                format!(
                    "invalid quorum option '{}', allowed: {}",
                    name,
                    ALLOWED_OPTIONS.join(", ")
                ),
            ));
        }
    }
    if let Some(batch) = reports.into_batch() {
        return Err(batch);
    }

    let mut conf = env.read_resource(ResourceKind::CorosyncConf)?;
    for (name, value) in options {
        let prefix = format!("quorum.{}=", name);
        let line = format!("quorum.{}={}", name, value);
        conf = blob::upsert_line(&conf, &prefix, &line);
    }
    env.write_resource(ResourceKind::CorosyncConf, conf)?;
    env.report(ReportItem::info(
        "QUORUM_OPTIONS_SET",
        format!("{} quorum option(s) updated", options.len()),
    ));
    Ok(CommandOutput::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::TracingSink;
    use crate::resource::MemStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn env_with_conf(data: &str) -> LibraryEnvironment {
        LibraryEnvironment::new(
            Arc::new(TracingSink),
            Arc::new(MemStore::new()),
            None,
            vec![],
            Duration::from_secs(10),
        )
        .mock_corosync_conf(data.to_string())
    }

    #[test]
    fn test_set_options_validates_names() {
        let mut env = env_with_conf("totem.version=2\n");
        let opts = vec![
            ("bogus".to_string(), "1".to_string()),
            ("wait_for_all".to_string(), "1".to_string()),
        ];
        let err = set_options(&mut env, &opts).unwrap_err();
        assert_eq!(err.items()[0].code, "INVALID_QUORUM_OPTION");
        // Nothing written on failure.
        assert_eq!(
            env.final_mocked_content(ResourceKind::CorosyncConf).unwrap(),
            "totem.version=2\n"
        );
    }

    #[test]
    fn test_set_options_rejects_empty() {
        let mut env = env_with_conf("");
        let err = set_options(&mut env, &[]).unwrap_err();
        assert_eq!(err.items()[0].code, "NO_OPTIONS");
    }

    #[test]
    fn test_set_options_upserts() {
        let mut env = env_with_conf("quorum.wait_for_all=0\n");
        let opts = vec![
            ("wait_for_all".to_string(), "1".to_string()),
            ("auto_tie_breaker".to_string(), "1".to_string()),
        ];
        set_options(&mut env, &opts).unwrap();
        assert_eq!(
            env.final_mocked_content(ResourceKind::CorosyncConf).unwrap(),
            "quorum.wait_for_all=1\nquorum.auto_tie_breaker=1\n"
        );
    }

    #[test]
    fn test_get_config_returns_text() {
        let mut env = env_with_conf("totem.version=2\n");
        match get_config(&mut env).unwrap() {
            CommandOutput::Text(t) => assert_eq!(t, "totem.version=2\n"),
            other => panic!("unexpected output: {:?}", other),
        }
    }
}
