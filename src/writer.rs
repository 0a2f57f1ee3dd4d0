use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::mpsc::Receiver,
};

use log::error;

use crate::{HomeboundError, navigation::NavigationOutput};

/// Write every navigation output to `file` as JSON Lines until the sender side
/// is dropped. The result can be replayed with
/// [`crate::location::ReplayLocationProvider::from_file`].
pub fn write_navigation(
    file: &Path,
    output_receiver: Receiver<NavigationOutput>,
) -> Result<(), HomeboundError> {
    let output_file = File::create(file).map_err(|e| HomeboundError::WriterError { source: e })?;
    let mut output_writer = BufWriter::new(output_file);
    for output in &output_receiver {
        let line = match serde_json::to_string(&output) {
            Ok(line) => line,
            Err(e) => {
                error!("Error while serializing navigation output: {}", e);
                continue;
            }
        };
        if let Err(e) = writeln!(output_writer, "{}", line) {
            error!("Error while writing navigation output to file: {}", e);
        }
    }
    output_writer
        .flush()
        .map_err(|e| HomeboundError::WriterError { source: e })?;
    Ok(())
}
