//! CSV output for provider records

use crate::record::{ProviderRecord, COLUMNS};
use crate::ProviderError;
use std::io::Write;
use std::path::Path;

/// Write the header and one row per record to any writer.
/// Returns the number of data rows written.
pub fn write_csv_to<W: Write>(records: &[ProviderRecord], out: W) -> Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Write records to a CSV file at `path`, replacing any existing file
pub fn write_csv<P: AsRef<Path>>(records: &[ProviderRecord], path: P) -> Result<usize, ProviderError> {
    let path = path.as_ref();
    let output_error = |source| ProviderError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(|e| output_error(csv::Error::from(e)))?;
    let rows = write_csv_to(records, file).map_err(output_error)?;
    log::debug!("Wrote {} rows to {}", rows, path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Gender, ServiceType};

    fn record(name: &str, service_type: ServiceType) -> ProviderRecord {
        ProviderRecord {
            name: name.into(),
            service_type,
            medical_group: "Acme Clinic".into(),
            phone: "(555) 123-4567".into(),
            gender: Gender::Male,
            languages: vec!["English".into()],
            specialties: vec!["Cardiology".into(), "Pediatrics".into()],
        }
    }

    #[test]
    fn test_header_and_rows() {
        let records = vec![
            record("Able Ann MD", ServiceType::Telemedicine),
            record("Cole Cal DO", ServiceType::Address("1 Main St, Springfield".into())),
        ];
        let mut buf = Vec::new();
        assert_eq!(write_csv_to(&records, &mut buf).unwrap(), 2);

        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "Name,Service Type,Medical Group,Phone,Gender,Languages Spoken,Specialties"
        );
        assert_eq!(
            lines[1],
            "Able Ann MD,Telemedicine,Acme Clinic,(555) 123-4567,Male,English,Cardiology - Pediatrics"
        );
        // Embedded commas are quoted
        assert!(lines[2].starts_with("Cole Cal DO,\"1 Main St, Springfield\",Acme Clinic"));
    }

    #[test]
    fn test_unwritable_destination() {
        let err = write_csv(&[], "/nonexistent-dir/out.csv").unwrap_err();
        assert!(matches!(err, ProviderError::OutputWrite { .. }));
    }
}
