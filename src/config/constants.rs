//! Configuration constants.
//!
//! Defaults for the batch sink, the log decoder and the Elasticsearch client.

use std::time::Duration;

/// Records that can be queued in the batch sink before producers wait
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;
/// Records written to the backend per batch
pub const DEFAULT_FLUSH_THRESHOLD: usize = 500;

/// Prefix of the daily destination names (`requests-YYYY-MM-DD`)
pub const DEFAULT_INDEX_BASE: &str = "requests";
pub const DEFAULT_ELASTIC_HOST: &str = "http://127.0.0.1:9200";

/// Docker link variable that overrides `--elastic`, e.g. `tcp://172.17.0.2:9200`
pub const ELASTIC_LINK_ENV: &str = "ELASTICSEARCH_PORT_9200_TCP";

/// nginx `combined`-style access log line without referer and user agent.
pub const DEFAULT_LINE_FORMAT: &str =
    "$remote_addr - - [$time_local] \"$method $uri $protocol\" $status $size";
/// strftime format of `$time_local`
pub const DEFAULT_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Records between two progress log lines
pub const PROGRESS_INTERVAL: u64 = 1000;

// Elasticsearch client timeouts
pub const ELASTIC_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Bulk requests of a full batch can be slow on a busy cluster
pub const ELASTIC_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Process exit code for any failed run
pub const EXIT_FAILURE: i32 = 2;
