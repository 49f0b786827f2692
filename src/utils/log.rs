use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Logs a message to a file with timestamp
///
/// # Arguments
///
/// * `log_dir` - Directory holding the log files (created if missing)
/// * `filename` - The name of the log file inside `log_dir`
/// * `message` - The message to log
pub fn log_to_file(log_dir: &Path, filename: &str, message: &str) -> Result<()> {
    fs::create_dir_all(log_dir)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(filename))?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

    writeln!(file, "\n--- Log entry at {} ---", timestamp)?;
    writeln!(file, "{}", message)?;
    writeln!(file, "--- End of entry ---\n")?;
    file.flush()?;

    Ok(())
}

/// Logs a message under a `===== header =====` banner.
pub fn log_with_header(log_dir: &Path, filename: &str, header: &str, message: &str) -> Result<()> {
    let formatted_message = format!(
        "===== {} =====\n{}\n====================",
        header, message
    );
    log_to_file(log_dir, filename, &formatted_message)
}

/// Appends a row to a CSV file, writing `headers` first if the file is new.
pub fn log_csv(log_dir: &Path, filename: &str, headers: &[&str], data: &[&str]) -> Result<()> {
    fs::create_dir_all(log_dir)?;

    let path = log_dir.join(filename);
    let file_exists = path.exists();

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let mut writer = csv::Writer::from_writer(file);

    if !file_exists && !headers.is_empty() {
        writer.write_record(headers)?;
    }
    writer.write_record(data)?;
    writer.flush()?;

    Ok(())
}
