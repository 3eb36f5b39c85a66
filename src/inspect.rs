//! Reading job JSON for the inspection tool.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::debug;

/// Open job JSON at the given path, or stdin if no path is given.
pub fn open_job(path: Option<&Path>) -> Result<Box<dyn Read>, String> {
    match path {
        Some(path) => {
            debug!("Reading job from {}", path.display());
            let file = File::open(path).map_err(|err| format!("{}: {}", path.display(), err))?;
            Ok(Box::new(file))
        }
        None => {
            debug!("Reading job from stdin");
            Ok(Box::new(io::stdin()))
        }
    }
}

/// Read job JSON from `reader`, refusing anything larger than `max_size` bytes.
///
/// At most `max_size + 1` bytes are read, so oversized input is rejected without buffering all
/// of it.
pub fn read_job<R: Read>(reader: R, max_size: usize) -> Result<String, String> {
    let mut raw_job = String::new();
    reader
        .take(max_size as u64 + 1)
        .read_to_string(&mut raw_job)
        .map_err(|err| err.to_string())?;

    if raw_job.len() > max_size {
        return Err(format!("job is larger than maximum size of {} bytes", max_size));
    }

    Ok(raw_job)
}
