use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::collections::HashMap;
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

/// Latency figures of a run, in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LatencyStats {
    pub min_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

/// Outcome counts of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunStats {
    pub total_iterations: u64,
    pub checks_passed: u64,
    pub checks_failed: u64,
    pub transport_failures: u64,
    /// Wall-clock time from the first VU starting to the last VU exiting, in seconds.
    pub wall_clock_s: f64,
    pub latency: LatencyStats,
}

/// Record of a single run, as stored in the run history file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    /// The unique run id
    ///
    /// Chosen by the runner unless passed on the command line.
    pub run_id: String,
    /// The name of the scenario that was run
    pub scenario_name: String,
    /// The time the run started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// The number of VUs the run was configured with
    pub vus: usize,
    /// Iterations each VU was asked to run, for iteration bounded runs
    pub iterations_per_vu: Option<u64>,
    /// Configured run duration in seconds, for duration bounded runs
    pub run_duration_s: Option<f64>,
    /// Pause between iterations of a VU, in seconds
    pub delay_s: f64,
    /// Scenario parameters that change the load shape, such as page sizes
    pub env: HashMap<String, String>,
    pub stats: RunStats,
    /// The version of the harness used for this run
    pub harness_version: String,
}

impl RunRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        run_id: String,
        scenario_name: String,
        started_at: i64,
        vus: usize,
        iterations_per_vu: Option<u64>,
        run_duration_s: Option<f64>,
        delay_s: f64,
        harness_version: String,
    ) -> Self {
        Self {
            run_id,
            scenario_name,
            started_at,
            vus,
            iterations_per_vu,
            run_duration_s,
            delay_s,
            env: HashMap::with_capacity(0),
            stats: RunStats::default(),
            harness_version,
        }
    }

    pub fn set_stats(&mut self, stats: RunStats) {
        self.stats = stats;
    }

    pub fn add_env(&mut self, key: String, value: String) {
        self.env.insert(key, value);
    }

    /// Compute a fingerprint for the configuration of this run
    ///
    /// Runs with the same fingerprint drove the same load shape and can be compared. It uses the
    ///     - Scenario name
    ///     - VU count
    ///     - Termination policy
    ///     - Delay
    ///     - Recorded scenario parameters
    ///     - Harness version
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        Digest::update(&mut hasher, self.scenario_name.as_bytes());
        Digest::update(&mut hasher, (self.vus as u64).to_le_bytes());
        if let Some(iterations) = self.iterations_per_vu {
            Digest::update(&mut hasher, b"iterations");
            Digest::update(&mut hasher, iterations.to_le_bytes());
        }
        if let Some(duration) = self.run_duration_s {
            Digest::update(&mut hasher, b"duration");
            Digest::update(&mut hasher, duration.to_le_bytes());
        }
        Digest::update(&mut hasher, self.delay_s.to_le_bytes());
        self.env
            .iter()
            .sorted_by_key(|(k, _)| k.to_owned())
            .for_each(|(k, v)| {
                Digest::update(&mut hasher, k.as_bytes());
                Digest::update(&mut hasher, v.as_bytes());
            });
        Digest::update(&mut hasher, self.harness_version.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

/// Append the run record to a file
///
/// The record will be serialized to JSON and output as a single line followed by a newline. The
/// recommended file extension is `.jsonl`.
pub fn append_run_record(run_record: RunRecord, path: PathBuf) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_run_record(run_record, &mut file)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Serialize the run record to a writer
pub fn store_run_record<W: Write>(run_record: RunRecord, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, &run_record)?;
    Ok(())
}

/// Load a run record from a reader
pub fn load_run_record<R: Read>(reader: R) -> anyhow::Result<RunRecord> {
    let reader = std::io::BufReader::new(reader);
    let run_record: RunRecord = serde_json::from_reader(reader)?;
    Ok(run_record)
}

/// Load run records from a file
///
/// The file should contain one JSON object per line. This is the format produced by
/// [append_run_record]. Blank lines are skipped.
pub fn load_run_records(path: PathBuf) -> anyhow::Result<Vec<RunRecord>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut runs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let run: RunRecord = serde_json::from_str(&line)?;
        runs.push(run);
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_record(run_id: &str) -> RunRecord {
        let mut record = RunRecord::new(
            run_id.to_string(),
            "seq_db_fetch_5k".to_string(),
            1_700_000_000,
            20,
            None,
            Some(10.0),
            0.2,
            "0.1.0".to_string(),
        );
        record.add_env("PAGE_SIZE".to_string(), "100".to_string());
        record.set_stats(RunStats {
            total_iterations: 900,
            checks_passed: 898,
            checks_failed: 2,
            transport_failures: 1,
            wall_clock_s: 10.3,
            latency: LatencyStats {
                min_ms: 1.5,
                max_ms: 80.0,
                ..Default::default()
            },
        });
        record
    }

    #[test]
    fn append_and_load_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");

        append_run_record(sample_record("first"), path.clone()).unwrap();
        append_run_record(sample_record("second"), path.clone()).unwrap();

        let runs = load_run_records(path).unwrap();
        assert_eq!(2, runs.len());
        assert_eq!(sample_record("first"), runs[0]);
        assert_eq!("second", runs[1].run_id);
    }

    #[test]
    fn store_and_load_single_record() {
        let mut buf = Vec::new();
        store_run_record(sample_record("single"), &mut buf).unwrap();

        let loaded = load_run_record(buf.as_slice()).unwrap();
        assert_eq!(sample_record("single"), loaded);
    }

    #[test]
    fn fingerprint_ignores_run_id_and_stats() {
        let first = sample_record("first");
        let mut second = sample_record("second");
        second.set_stats(RunStats::default());

        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn fingerprint_changes_with_load_shape() {
        let first = sample_record("first");
        let mut second = sample_record("first");
        second.vus = 10;
        let mut third = sample_record("first");
        third.add_env("TOTAL_PAGES".to_string(), "10".to_string());

        assert_ne!(first.fingerprint(), second.fingerprint());
        assert_ne!(first.fingerprint(), third.fingerprint());
    }
}
