//! # Script Replay
//!
//! The runtime binary's replay loop over a complete script.

#[cfg(test)]
mod tests {
    use bc_runtime::{instantiate, run_script, RuntimeConfig};
    use serde_json::Value;
    use std::io::Cursor;

    const SCRIPT: &str = r#"
# onboarding
{"function":"invoke","args":["createOrg","org1","OrgOne"],"txId":"t1","timestamp":"2018-06-01T01:00:00Z"}
{"function":"invoke","args":["issueCoin","5000"],"txId":"t2","timestamp":"2018-06-01T01:01:00Z"}
{"function":"invoke","args":["transfer","Agency","org1","2000"],"txId":"t3","timestamp":"2018-06-01T01:02:00Z"}
{"function":"invoke","args":["submitRecord","org1","rec1","clientA","Alice","1","3","late payment"]}
{"function":"invoke","args":["transfer","org1","Agency","9999"]}
{"function":"invoke","args":["queryRecord","byClientId","clientA"]}
{"function":"invoke","args":["queryAgency"]}
"#;

    #[test]
    fn test_replay_outputs_one_response_per_step() {
        let mut host = instantiate(&RuntimeConfig::default()).unwrap();
        let mut out = Vec::new();
        let summary = run_script(&mut host, Cursor::new(SCRIPT), &mut out).unwrap();

        assert_eq!(summary.steps, 7);
        assert_eq!(summary.failed, 1);

        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[4]["status"], 400);
        assert!(lines[4]["message"]
            .as_str()
            .unwrap()
            .starts_with("INSUFFICIENT_CREDIT"));

        let records: Vec<Value> =
            serde_json::from_str(lines[5]["payload"].as_str().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["recordId"], "rec1");

        let agency: Value = serde_json::from_str(lines[6]["payload"].as_str().unwrap()).unwrap();
        assert_eq!(agency["credit"], 100_003_000u64);
        assert_eq!(agency["issueCredit"], 100_005_000u64);
    }

    #[test]
    fn test_replay_commits_per_step() {
        let mut host = instantiate(&RuntimeConfig::default()).unwrap();
        run_script(&mut host, Cursor::new(SCRIPT), std::io::sink()).unwrap();
        let stats = host.stats();
        assert_eq!(stats.committed, 5);
        assert_eq!(stats.queries, 2);
        assert_eq!(stats.rolled_back, 1);
    }
}
