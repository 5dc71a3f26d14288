use std::fmt::Write;

use itoa::Buffer;

use super::{Metric, SampleRate};

/// Appends `prefix + name:value|type[|@rate]` to `out`, without a trailing
/// newline.
///
/// No escaping is applied to `name`; `:`, `|`, `@` and newlines in names
/// corrupt the line.
///
/// A negative gauge is preceded by `prefix + name:0|g` and a newline, since
/// StatsD treats a signed gauge as a delta. Callers must drop non-finite
/// gauges first (see [`Metric::is_finite`]).
pub fn write_line(out: &mut String, prefix: &str, name: &str, metric: &Metric, rate: SampleRate) {
    out.reserve(line_len_hint(prefix, name, metric));
    if matches!(metric, Metric::Gauge(value) if value.is_sign_negative() && *value != 0.0) {
        out.push_str(prefix);
        out.push_str(name);
        out.push_str(":0|g\n");
    }
    out.push_str(prefix);
    out.push_str(name);
    out.push(':');
    write_value(out, metric);
    out.push('|');
    out.push_str(metric.metric_type().as_str());
    if !rate.is_unsampled() {
        // Display on f64 yields the shortest repr that round-trips.
        let _ = write!(out, "|@{}", rate.value());
    }
}

/// Renders a single line without any prefix.
///
/// ```
/// use statsd_queue::{serialize, Metric, SampleRate};
///
/// assert_eq!("hits:1|c", serialize("hits", &Metric::Count(1), SampleRate::ALWAYS));
/// assert_eq!("latency:42|ms|@0.5", serialize("latency", &Metric::Timing(42), SampleRate::new(0.5)));
/// ```
#[must_use]
pub fn serialize(name: &str, metric: &Metric, rate: SampleRate) -> String {
    let mut out = String::new();
    write_line(&mut out, "", name, metric, rate);
    out
}

fn write_value(out: &mut String, metric: &Metric) {
    let mut buffer = Buffer::new();
    match metric {
        Metric::Count(value) => out.push_str(buffer.format(*value)),
        Metric::Timing(value) => out.push_str(buffer.format(*value)),
        // -0.0 would render as "-0", a delta on the wire.
        Metric::Gauge(value) if *value == 0.0 => out.push('0'),
        Metric::Gauge(value) => {
            let _ = write!(out, "{value}");
        }
        Metric::Set(token) => out.push_str(token),
    }
}

#[inline]
fn line_len_hint(prefix: &str, name: &str, metric: &Metric) -> usize {
    // ':' + '|' + type + "|@0.xxxx"
    let value_len = match metric {
        Metric::Set(token) => token.len(),
        _ => 20,
    };
    prefix.len() + name.len() + value_len + 2 + 2 + 10
}
