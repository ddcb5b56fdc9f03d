//! Example demonstrating timestamp layouts selected through hints

use chrono::{DateTime, FixedOffset};
use patchpanel::{PatchPanel, Tagged, TypeInfo};

#[derive(Debug, Tagged)]
struct Schedule {
    // RFC 3339 when no hint is given
    #[tag(default = "2023-01-02T15:04:05Z")]
    pub launch: DateTime<FixedOffset>,

    #[tag(default = "3:00PM", timeFormat = "Kitchen")]
    pub tea_time: DateTime<FixedOffset>,

    #[tag(default = "2024-12-31", timeFormat = "DateOnly")]
    pub cutoff: DateTime<FixedOffset>,

    #[tag(default = "three thirty-ish", timeFormat = "Kitchen")]
    pub vague: DateTime<FixedOffset>,
}

fn main() -> anyhow::Result<()> {
    let panel = PatchPanel::default();
    let ty = Some(TypeInfo::of::<Schedule>());
    let hints = ["timeFormat"];

    let launch: DateTime<FixedOffset> = panel.get_default_as("launch", ty, &hints)?;
    let tea_time: DateTime<FixedOffset> = panel.get_default_as("tea_time", ty, &hints)?;
    let cutoff: DateTime<FixedOffset> = panel.get_default_as("cutoff", ty, &hints)?;

    println!("Schedule:");
    println!("  Launch: {launch}");
    println!("  Tea time: {}", tea_time.time());
    println!("  Cutoff: {}", cutoff.date_naive());

    // A malformed value still reports the field and the zero timestamp
    match panel.get_field_tag("vague", "default", ty, &hints) {
        Ok(resolved) => println!("  Vague: {:?}", resolved.value),
        Err(err) => {
            let field = err.field().map(|f| f.name()).unwrap_or("?");
            let partial = err
                .partial_value()
                .and_then(|v| v.downcast_ref::<DateTime<FixedOffset>>());
            println!("  Vague ({field}) failed: {err}; partial value {partial:?}");
        }
    }

    Ok(())
}
