use std::fs;
use std::path::Path;
use tracing::warn;

/// One line of an association file: a depth frame paired with the color frame taken with it.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct AssociationRecord {
    /// Identifies the frame, also in trajectory files.
    pub depth_id: String,
    pub depth_file: String,
    pub color_id: String,
    pub color_file: String
}

/**
 * Lines are `<depth id> <depth file> <color id> <color file>`. Tokens after the fourth are
 * ignored, blank and `#` lines are skipped and shorter lines are dropped with a warning.
 */
pub fn parse_associations(contents: &str) -> Vec<AssociationRecord> {
    let mut records = Vec::<AssociationRecord>::new();

    for (line_number, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = trimmed.split_whitespace().take(4).collect::<Vec<&str>>();
        match tokens.as_slice() {
            [depth_id, depth_file, color_id, color_file] => records.push(AssociationRecord {
                depth_id: depth_id.to_string(),
                depth_file: depth_file.to_string(),
                color_id: color_id.to_string(),
                color_file: color_file.to_string()
            }),
            _ => warn!("association line {} is malformed: {}", line_number + 1, trimmed)
        }
    }

    records
}

pub fn load_associations(file_path: &Path) -> Option<Vec<AssociationRecord>> {
    match fs::read_to_string(file_path) {
        Ok(contents) => Some(parse_associations(&contents)),
        Err(e) => {
            warn!("cannot read the association file {}: {}", file_path.display(), e);
            None
        }
    }
}
