/// Sends the same measurement under one or more names through
/// [`Client::send`](crate::Client::send), so the configured send mode applies.
///
/// A trailing `; rate` sets the sample rate, otherwise `1.0` is used. The other
/// macros in this module are shorthands for this one.
///
/// # Examples
///
/// ```
/// use statsd_queue::{update_stats, Client, IniConfig, Metric};
/// use std::sync::Arc;
///
/// let client = Client::new(Arc::new(IniConfig::new()));
///
/// update_stats!(client, "jobs.done", "jobs.total" => Metric::Count(5));
/// update_stats!(client, "jobs.done" => Metric::Count(5); 0.25);
/// ```
#[macro_export]
macro_rules! update_stats {
    ($client:expr, $($stat:expr),+ => $metric:expr; $rate:expr) => {
        {
            let metric: $crate::Metric = $metric;
            $client.send(
                [$((::std::string::String::from($stat), metric.clone())),+],
                $rate,
            )
        }
    };
    ($client:expr, $($stat:expr),+ => $metric:expr) => {
        $crate::update_stats!($client, $($stat),+ => $metric; 1.0)
    };
}

/// Increments one or more counters by one.
///
/// # Examples
///
/// ```
/// use statsd_queue::{increment, Client, IniConfig};
/// use std::sync::Arc;
///
/// let client = Client::new(Arc::new(IniConfig::new()));
///
/// increment!(client, "pageviews");
/// increment!(client, "pageviews", "home.views");
/// // sampled at 10%
/// increment!(client, "pageviews"; 0.1);
/// ```
#[macro_export]
macro_rules! increment {
    ($client:expr, $($stat:expr),+; $rate:expr) => {
        $crate::update_stats!($client, $($stat),+ => $crate::Metric::Count(1); $rate)
    };
    ($client:expr, $($stat:expr),+) => {
        $crate::update_stats!($client, $($stat),+ => $crate::Metric::Count(1))
    };
}

/// Decrements one or more counters by one.
///
/// # Examples
///
/// ```
/// use statsd_queue::{decrement, Client, IniConfig};
/// use std::sync::Arc;
///
/// let client = Client::new(Arc::new(IniConfig::new()));
///
/// decrement!(client, "workers.idle");
/// decrement!(client, "workers.idle"; 0.5);
/// ```
#[macro_export]
macro_rules! decrement {
    ($client:expr, $($stat:expr),+; $rate:expr) => {
        $crate::update_stats!($client, $($stat),+ => $crate::Metric::Count(-1); $rate)
    };
    ($client:expr, $($stat:expr),+) => {
        $crate::update_stats!($client, $($stat),+ => $crate::Metric::Count(-1))
    };
}

/// Records an elapsed time in milliseconds for one or more names.
///
/// # Examples
///
/// ```
/// use statsd_queue::{timing, Client, IniConfig};
/// use std::sync::Arc;
///
/// let client = Client::new(Arc::new(IniConfig::new()));
///
/// timing!(client, "render_time" => 320);
/// ```
#[macro_export]
macro_rules! timing {
    ($client:expr, $($stat:expr),+ => $millis:expr) => {
        $crate::update_stats!($client, $($stat),+ => $crate::Metric::Timing($millis))
    };
}

/// Sets one or more gauges to a value.
///
/// # Examples
///
/// ```
/// use statsd_queue::{gauge, Client, IniConfig};
/// use std::sync::Arc;
///
/// let client = Client::new(Arc::new(IniConfig::new()));
///
/// gauge!(client, "active_users" => 42);
/// gauge!(client, "load.avg" => 0.75);
/// ```
#[macro_export]
macro_rules! gauge {
    ($client:expr, $($stat:expr),+ => $value:expr) => {
        $crate::update_stats!($client, $($stat),+ => $crate::Metric::gauge($value))
    };
}

/// Counts a unique event token for one or more set metrics.
///
/// # Examples
///
/// ```
/// use statsd_queue::{set, Client, IniConfig};
/// use std::sync::Arc;
///
/// let client = Client::new(Arc::new(IniConfig::new()));
///
/// set!(client, "uniques" => 1234);
/// set!(client, "uniques" => "user-1234");
/// ```
#[macro_export]
macro_rules! set {
    ($client:expr, $($stat:expr),+ => $token:expr) => {
        $crate::update_stats!($client, $($stat),+ => $crate::Metric::set($token))
    };
}
