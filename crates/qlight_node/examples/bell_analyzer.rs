//! QLIGHT Bell Analyzer Demo
//!
//! Builds an SPDC source node emitting |Φ+⟩ pairs, sends each arm through
//! a polarization analyzer and sweeps the signal-side plate angle.
//!
//! Run with `RUST_LOG=info` to see emission logs.

use qlight_node::prelude::*;
use std::f64::consts::PI;

const NODE_CONFIG: &str = r#"{
    "wavelengths": [1550, 1550],
    "frequency": "8e7",
    "mean_photon_num": "0.1",
    "encoding": "polarization",
    "bell_state": "phi+",
    "photon_statistics": "thermal",
    "seed": 7
}"#;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("═══════════════════════════════════════════════════════════════════════");
    println!("  QLIGHT Bell Analyzer Demo");
    println!("═══════════════════════════════════════════════════════════════════════\n");

    let config = SourceNodeConfig::from_json(NODE_CONFIG)?;
    let pulses = 2000usize;

    println!("Configuration:");
    println!("  • Bell state: {:?}", config.bell_state);
    println!("  • Frequency: {} Hz", config.frequency);
    println!("  • Mean pair number: {}", config.mean_photon_num);
    println!("  • Pulses per run: {}", pulses);
    println!();

    println!("┌──────────┬──────────┬──────────┬──────────┐");
    println!("│ Angle    │ Pairs    │ Signal   │ Idler    │");
    println!("├──────────┼──────────┼──────────┼──────────┤");

    let mut last = None;
    for step in 0..5 {
        let angle = step as f64 * PI / 16.0;
        let mut timeline = Timeline::new().with_seed(42);
        let mut source = SourceNode::build("source", &config, &mut timeline)?;
        let signal =
            PolarizationAnalyzer::build("signal", angle, Some(Subsystem::Signal), &mut timeline)?;
        let idler =
            PolarizationAnalyzer::build("idler", 0.0, Some(Subsystem::Idler), &mut timeline)?;
        source.connect(&mut timeline, 0, signal.input())?;
        source.connect(&mut timeline, 1, idler.input())?;
        timeline.init()?;

        source.emit_pulses(&mut timeline, pulses)?;
        timeline.run()?;

        println!(
            "│ {:8.4} │ {:8} │ {:8} │ {:8} │",
            angle,
            source.emission_count(&timeline)?,
            signal.detection_count(&timeline)?,
            idler.detection_count(&timeline)?
        );
        last = Some((timeline, source));
    }

    println!("└──────────┴──────────┴──────────┴──────────┘\n");

    if let Some((timeline, source)) = last {
        let path = source.export_timestamps(&timeline, std::env::temp_dir())?;
        println!("Timestamps written to {}", path.display());
    }

    Ok(())
}
