use rtic::mutex_prelude::*;
use rtt_target::rprintln;

use encoder_firmware::{ChannelCounts, EncoderCounts};

use crate::app::{periodic_report, REPORT_PERIOD};

/// Room for `{"channel1":{"position":-128,"errors":4294967295},"channel2":{...}}`.
const REPORT_SIZE: usize = 128;

pub(crate) fn periodic_report(
    // the encoder handlers run at a higher priority, so every read goes through `lock`.
    // that masks them for the few cycles it takes to copy the counters out, so the u32
    // error counts are never torn.
    mut context: periodic_report::Context,
) {
    /*
        entering critical section
    */
    let channel1: ChannelCounts = context.shared.encoder1.lock(|encoder| encoder.counts());
    let channel2: ChannelCounts = context.shared.encoder2.lock(|encoder| encoder.counts());
    /*
        leaving critical section
    */
    let counts = EncoderCounts { channel1, channel2 };

    match serde_json_core::to_string::<_, REPORT_SIZE>(&counts) {
        Ok(line) => {
            let line: heapless::String<REPORT_SIZE> = line;
            rprintln!("{}", line);
        }
        Err(e) => {
            rprintln!("[ERROR] Failed to encode report, error {:?}", e);
        }
    }

    let last_report: &mut EncoderCounts = context.local.last_report;
    let channels = [
        ("encoder1", &counts.channel1, &last_report.channel1),
        ("encoder2", &counts.channel2, &last_report.channel2),
    ];
    for (name, now, before) in channels {
        let new_errors = now.errors_since(before);
        if new_errors != 0 {
            // both lines changed between two samples; an edge went missing somewhere.
            rprintln!(
                "[WARNING] {} saw {} illegal transitions since the last report",
                name,
                new_errors
            );
        }
    }
    *last_report = counts;

    if let Err(_) = periodic_report::spawn_after(REPORT_PERIOD) {
        rprintln!("[ERROR] failed to reschedule the report task!");
    }
}
