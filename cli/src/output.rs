use std::io::Write;

use mcast_core::{ComparisonPoint, EventSink, SimEvent, SweepResult, VerificationReport};
use tracing::warn;

/// Writes each event as one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: SimEvent) {
        let written = serde_json::to_writer(&mut self.out, &event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(e) = written {
            warn!(error = %e, "failed to write event");
        }
    }
}

pub fn print_report(report: &VerificationReport) {
    println!("Verification (group resource id {})", report.group_resource_id);
    for member in &report.members {
        println!("  group device {:>4} received {:?}", member.device, member.delivered);
    }
    if !report.non_members.is_empty() {
        println!("  non-group devices {:?} received nothing, as expected", report.non_members);
    }

    let s = &report.stats;
    println!();
    println!("  packets sent      {}", s.packets_sent);
    println!("  slots used        {}", s.slots_used);
    println!("  dropped           {}", s.dropped_opportunities);
    println!("  ACK / NACK        {} / {}", s.acks, s.nacks);
    match s.observed_reliability {
        Some(r) => println!("  reliability       {:.1}%", r * 100.0),
        None => println!("  reliability       n/a"),
    }
    if let Some(last) = s.slot_history.last() {
        println!("  smoothed (slot {}) {:.1}%", last.slot, last.smoothed_reliability * 100.0);
    }
    println!(
        "  resource units    {} multicast vs {} unicast-equivalent",
        s.resource_units_consumed, s.unicast_equivalent_units
    );
}

pub fn print_sweep(results: &[SweepResult]) {
    println!("{:>6} {:>6} {:>8} {:>8} {:>8} {:>12} {:>12}", "UEs", "group", "ACK", "NACK", "rel%", "mc units", "uc units");
    for r in results {
        let s = &r.report.stats;
        println!(
            "{:>6} {:>6} {:>8} {:>8} {:>8.1} {:>12} {:>12}",
            r.population,
            r.group_size,
            s.acks,
            s.nacks,
            s.observed_reliability.unwrap_or(0.0) * 100.0,
            s.resource_units_consumed,
            s.unicast_equivalent_units,
        );
    }
}

pub fn print_comparison(points: &[ComparisonPoint]) {
    println!(
        "{:>5} | {:>8} {:>7} {:>7} {:>5} {:>8} | {:>8} {:>7} {:>7} {:>5} {:>8}",
        "UEs", "uc Mbps", "rel%", "p10%", "RBs", "tput", "mc Mbps", "rel%", "p10%", "RBs", "tput"
    );
    for p in points {
        let (u, m) = (&p.unicast, &p.multicast);
        println!(
            "{:>5} | {:>8.2} {:>7.2} {:>7.1} {:>5} {:>8.2} | {:>8.2} {:>7.2} {:>7.1} {:>5} {:>8.2}",
            p.population,
            u.per_device_rate_mbps,
            u.reliability_pct,
            u.worst_decile_reliability_pct,
            u.units_used,
            u.throughput_mbps,
            m.per_device_rate_mbps,
            m.reliability_pct,
            m.worst_decile_reliability_pct,
            m.units_used,
            m.throughput_mbps,
        );
    }
}
