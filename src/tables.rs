use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};
use kcwater::Reading;

pub fn build_readings_table(readings: &[Reading]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Time", "Consumption", "UoM", "Raw", "Scaled read", "Meter", "Port"]);
    for reading in readings {
        table.add_row(vec![
            Cell::new(reading.read_date_time.format("%Y-%m-%d %H:%M")),
            Cell::new(&reading.gallons_consumption).set_alignment(CellAlignment::Right),
            Cell::new(&reading.uom).add_attribute(Attribute::Dim),
            Cell::new(&reading.raw_consumption).set_alignment(CellAlignment::Right),
            Cell::new(&reading.scaled_read).set_alignment(CellAlignment::Right),
            Cell::new(reading.meter_number.as_deref().unwrap_or("-")),
            Cell::new(&reading.port).add_attribute(Attribute::Dim),
        ]);
    }
    table
}
