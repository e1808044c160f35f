//! Example of splitting text files with repeated headers

use emx_split::{
    detect_bom, BatchNaming, DetectionMode, ErrorPolicy, SplitConfig, Splitter, TextEncoding,
};
use std::fs;

fn main() -> anyhow::Result<()> {
    println!("=== Split Example ===\n");

    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("chunks");
    fs::create_dir(&out)?;

    // Plain CSV: one header row, 25 data rows
    let orders = dir.path().join("orders.csv");
    let mut content = String::from("id,item,qty\n");
    for i in 1..=25 {
        content.push_str(&format!("{},widget-{},{}\n", i, i, i % 4 + 1));
    }
    fs::write(&orders, content)?;

    // UTF-16 file with a byte-order mark
    let wide = dir.path().join("cities.txt");
    let mut bytes = TextEncoding::Unicode.preamble().to_vec();
    TextEncoding::Unicode.encode_into("city\nK\u{F6}ln\nZ\u{FC}rich\nM\u{FC}nchen\n", &mut bytes);
    println!("cities.txt starts with a {:?} mark\n", detect_bom(&bytes));
    fs::write(&wide, bytes)?;

    // Sequential names, encoding sniffed per file
    let config = SplitConfig::new([orders.to_string_lossy(), wide.to_string_lossy()], 10)
        .with_export_dir(&out)
        .with_detection(DetectionMode::PerFile)
        .with_error_policy(ErrorPolicy::Continue);
    let report = Splitter::new(config).split()?;

    for split in &report.files {
        println!(
            "{} ({}, {} data lines):",
            split.input.display(),
            split.encoding,
            split.data_lines
        );
        for output in &split.outputs {
            println!("  - {} ({} lines)", output.path.display(), output.data_lines);
        }
    }

    // Line-range names, header left out, encoding fixed
    let config = SplitConfig::new([orders.to_string_lossy()], 10)
        .with_export_dir(&out)
        .with_skip_header(true)
        .with_encoding(TextEncoding::Utf8)
        .with_naming(BatchNaming::LineRange);
    let report = Splitter::new(config).split()?;

    println!("\nBy line range, without header:");
    for output in report.files.iter().flat_map(|f| &f.outputs) {
        println!("  - {}", output.path.file_name().unwrap_or_default().to_string_lossy());
    }

    Ok(())
}
