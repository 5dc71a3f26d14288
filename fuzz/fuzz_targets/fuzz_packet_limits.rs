#![no_main]

use libfuzzer_sys::fuzz_target;
use statsd_queue::{MetricResult, PacketWriter, Writer};
use std::cell::RefCell;

#[derive(Default)]
struct Recorder {
    datagrams: RefCell<Vec<Vec<u8>>>,
}

impl Writer for Recorder {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        self.datagrams.borrow_mut().push(buf.to_vec());
        Ok(buf.len())
    }
}

// Every line must arrive exactly once, and only oversized lines may exceed the limit
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let max_packet_size = usize::from(data[0]).max(1);
    let text = String::from_utf8_lossy(&data[1..]);
    let lines: Vec<&str> = text.split('\n').collect();

    let recorder = Recorder::default();
    let mut writer = PacketWriter::new(&recorder, max_packet_size);
    let result: MetricResult<usize> = lines
        .iter()
        .try_for_each(|line| writer.write_line(line))
        .and_then(|()| writer.finish());
    assert!(result.is_ok());

    let datagrams = recorder.datagrams.borrow();
    let mut rebuilt = Vec::new();
    for datagram in datagrams.iter() {
        let datagram = String::from_utf8_lossy(datagram);
        if datagram.len() > max_packet_size {
            assert!(!datagram.contains('\n'));
        }
        rebuilt.extend(datagram.split('\n').map(str::to_string));
    }
    let expected: Vec<String> = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| (*line).to_string())
        .collect();
    rebuilt.retain(|line| !line.is_empty());
    assert_eq!(expected, rebuilt);
});
