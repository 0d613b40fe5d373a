//! Memory calculator for tannenbaum
//!
//! Prints the RAM footprint of the tree's state machines for common time
//! types and melody capacities, so firmware can size its static allocation.
//!
//! Usage:
//!   cd tools/sizeof-calculator
//!   cargo run --release
//!   cat report.md

use embassy_time::Duration as EmbassyDurationInner;
use embassy_time::Instant as EmbassyInstantInner;
use std::fs::File;
use std::io::Write;
use std::mem::size_of;
use tannenbaum::{
    CommandTable, Controller, LightShow, Melody, MelodyPlayer, Pad, Pin, PwmChannel, PwmOutputs,
    Tannenbaum, TemplateMap, TimeDuration, TimeInstant, TimeSource, ToneOutput, Token,
    TouchSensor,
};

// ============================================================================
// Time Types
// ============================================================================

// u32 milliseconds duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Duration32(u32);

impl TimeDuration for Duration32 {
    const ZERO: Self = Duration32(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        Duration32(millis as u32)
    }

    fn saturating_sub(self, other: Self) -> Self {
        Duration32(self.0.saturating_sub(other.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Instant32(u32);

impl TimeInstant for Instant32 {
    type Duration = Duration32;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Duration32(self.0.wrapping_sub(earlier.0))
    }
}

// Embassy wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EmbassyDuration(EmbassyDurationInner);

impl TimeDuration for EmbassyDuration {
    const ZERO: Self = EmbassyDuration(EmbassyDurationInner::from_ticks(0));

    fn as_millis(&self) -> u64 {
        self.0.as_millis()
    }

    fn from_millis(millis: u64) -> Self {
        EmbassyDuration(EmbassyDurationInner::from_millis(millis))
    }

    fn saturating_sub(self, other: Self) -> Self {
        EmbassyDuration(EmbassyDurationInner::from_ticks(
            self.0.as_ticks().saturating_sub(other.0.as_ticks()),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EmbassyInstant(EmbassyInstantInner);

impl TimeInstant for EmbassyInstant {
    type Duration = EmbassyDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        EmbassyDuration(self.0 - earlier.0)
    }
}

struct Clock;

impl TimeSource<Instant32> for Clock {
    fn now(&self) -> Instant32 {
        Instant32(0)
    }
}

impl TimeSource<EmbassyInstant> for Clock {
    fn now(&self) -> EmbassyInstant {
        EmbassyInstant(EmbassyInstantInner::from_ticks(0))
    }
}

// ============================================================================
// Peripheral Stand-ins
// ============================================================================

// Zero-sized, as a HAL peripheral singleton typically is
struct Pwm;

impl PwmOutputs for Pwm {
    fn configure_channel(&mut self, _: PwmChannel, _: u32, _: u8) {}
    fn attach(&mut self, _: Pin, _: PwmChannel) {}
    fn detach(&mut self, _: Pin) {}
    fn write_duty(&mut self, _: PwmChannel, _: u16) {}
}

struct Buzzer;

impl ToneOutput for Buzzer {
    fn start_tone(&mut self, _: u32) {}
    fn stop_tone(&mut self) {}
}

struct Touch;

impl TouchSensor for Touch {
    fn read_filtered(&mut self, _: Pad) -> u16 {
        0
    }
}

type Tree = Tannenbaum<Pwm, Buzzer, TemplateMap<4>>;

// ============================================================================
// Report Generation Functions
// ============================================================================

fn write_header(f: &mut File) -> std::io::Result<()> {
    writeln!(f, "# Tannenbaum Memory Footprint Analysis")?;
    writeln!(f)?;
    writeln!(
        f,
        "**Generated:** {}  ",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(
        f,
        "**Architecture:** {}-bit host",
        std::mem::size_of::<usize>() * 8
    )?;
    writeln!(f)?;
    Ok(())
}

fn write_component_sizes(f: &mut File) -> std::io::Result<()> {
    writeln!(f, "## Component Sizes")?;
    writeln!(f)?;
    writeln!(f, "| Component | Size |")?;
    writeln!(f, "|-----------|------|")?;
    writeln!(f, "| `Token` | {} B |", size_of::<Token>())?;
    writeln!(f, "| `LightShow` | {} B |", size_of::<LightShow<Pwm>>())?;
    writeln!(f, "| `TemplateMap<4>` | {} B |", size_of::<TemplateMap<4>>())?;
    writeln!(
        f,
        "| `CommandTable<Tannenbaum, 16>` | {} B |",
        size_of::<CommandTable<Tree, 16>>()
    )?;
    writeln!(f, "| `Tannenbaum` | {} B |", size_of::<Tree>())?;
    writeln!(f)?;
    Ok(())
}

fn write_melody_table(f: &mut File) -> std::io::Result<()> {
    writeln!(f, "## Melody Memory Usage")?;
    writeln!(f)?;
    writeln!(f, "| Capacity | `Melody` | `MelodyPlayer` | Player OH |")?;
    writeln!(f, "|----------|----------|----------------|-----------|")?;

    let rows = [
        (16, size_of::<Melody<16>>(), size_of::<MelodyPlayer<Buzzer, 16>>()),
        (32, size_of::<Melody<32>>(), size_of::<MelodyPlayer<Buzzer, 32>>()),
        (64, size_of::<Melody<64>>(), size_of::<MelodyPlayer<Buzzer, 64>>()),
        (128, size_of::<Melody<128>>(), size_of::<MelodyPlayer<Buzzer, 128>>()),
    ];
    for (capacity, melody, player) in rows {
        writeln!(
            f,
            "| {} | {} B | {} B | {} B |",
            capacity,
            melody,
            player,
            player - melody
        )?;
    }
    writeln!(f)?;
    Ok(())
}

fn write_controller_table(f: &mut File) -> std::io::Result<()> {
    writeln!(f, "## Controller Memory Usage")?;
    writeln!(f)?;
    writeln!(f, "| Time Type | Instant | `Controller` |")?;
    writeln!(f, "|-----------|---------|--------------|")?;
    writeln!(
        f,
        "| `u32` (milliseconds) | {} B | {} B |",
        size_of::<Instant32>(),
        size_of::<Controller<'static, Instant32, Clock, Pwm, Buzzer, TemplateMap<4>, Touch>>()
    )?;
    writeln!(
        f,
        "| Embassy `Instant` | {} B | {} B |",
        size_of::<EmbassyInstant>(),
        size_of::<Controller<'static, EmbassyInstant, Clock, Pwm, Buzzer, TemplateMap<4>, Touch>>()
    )?;
    writeln!(f)?;
    Ok(())
}

fn main() -> std::io::Result<()> {
    let report_path = "report.md";

    // Remove old report if it exists
    let _ = std::fs::remove_file(report_path);

    let mut file = File::create(report_path)?;

    println!("Generating memory footprint analysis...");

    write_header(&mut file)?;
    write_component_sizes(&mut file)?;
    write_melody_table(&mut file)?;
    write_controller_table(&mut file)?;

    println!("✓ Report generated: {}", report_path);
    println!("  View with: cat {}", report_path);

    Ok(())
}
