#![no_main]

use libfuzzer_sys::fuzz_target;
use statsd_queue::{max_packet_size, ConfigProvider, IniConfig, SendMode, StatsdSettings};

// Arbitrary text must either parse or fail with an error, never panic
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(config) = text.parse::<IniConfig>() {
        let _ = config.is_enabled("statsd");
        let _ = config.lookup("statsd.host");
        let _ = StatsdSettings::from_config(&config);
        let _ = SendMode::from_config(&config);
        let _ = max_packet_size(&config);
    }
});
