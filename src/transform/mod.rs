//! Record transformation engine

pub mod ahv;
pub mod derive;
mod mapper;
pub mod phone;

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Config;
use crate::model::fields::*;
use crate::model::{OutputRow, ProcessedDataset, RawDataset, RawRow, Record, RecordShape, Warning};

pub use ahv::NationalIdError;
pub use derive::DerivationError;
pub use mapper::map_row;
pub use phone::PhoneError;

/// Fixed greeting placeholder written to every record
pub const GREETING_PLACEHOLDER: &str = "Liebe(r) ...";

/// The instant a run happens at; shared by all rows of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTime {
    /// Timestamp stamped on every processed row
    pub instant: DateTime<Utc>,
    /// Local calendar day used in dated remarks
    pub today: NaiveDate,
}

impl RunTime {
    /// The current instant and local day
    pub fn now() -> Self {
        Self {
            instant: Utc::now(),
            today: Local::now().date_naive(),
        }
    }

    /// A fixed instant; the day is taken in UTC
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            today: instant.date_naive(),
        }
    }

    /// Sortable textual form, e.g. `2024-03-05T13:30:00.000Z`
    pub fn timestamp(&self) -> String {
        self.instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Default for RunTime {
    fn default() -> Self {
        Self::now()
    }
}

/// Pick the primary and alternate e-mail from athlete, mother and father.
///
/// The primary is the first non-empty candidate, the alternate the next
/// non-empty one after it.
pub fn consolidate_email<'a>(
    candidates: [Option<&'a str>; 3],
) -> (Option<&'a str>, Option<&'a str>) {
    let mut present = candidates.into_iter().flatten().filter(|e| !e.is_empty());
    let primary = present.next();
    let alternate = present.next();
    (primary, alternate)
}

/// Transforms single rows of one shape
#[derive(Debug, Clone, Copy)]
pub struct RecordTransformer {
    shape: RecordShape,
    run_time: RunTime,
}

impl RecordTransformer {
    /// Create a transformer for a shape and run instant
    pub fn new(shape: RecordShape, run_time: RunTime) -> Self {
        Self { shape, run_time }
    }

    /// Shape this transformer produces
    pub fn shape(&self) -> RecordShape {
        self.shape
    }

    /// Transform one raw row; `row` is its 1-based position in the input.
    ///
    /// Never fails: problems with single fields degrade that field and are
    /// reported as warnings.
    pub fn transform(&self, raw: &RawRow, row: usize) -> (OutputRow, Vec<Warning>) {
        let mut warnings = Vec::new();
        let mut record = map_row(raw, self.shape);

        let salutation = derive::salutation(record.get(GENDER));
        self.set_derived(&mut record, SALUTATION, salutation, row, &mut warnings);
        record.set(GREETING, GREETING_PLACEHOLDER);

        if self.shape == RecordShape::Standard {
            let entry = derive::entry_date(record.get(RECEIVED_ON));
            self.set_derived(&mut record, ENTRY_DATE, entry, row, &mut warnings);

            let status = derive::membership_status(record.get(MEMBERSHIP));
            self.set_derived(&mut record, STATUS, status, row, &mut warnings);
        }

        self.normalize_phone(&mut record, EMERGENCY_PHONE, EMERGENCY_PHONE, row, &mut warnings);
        match self.shape {
            RecordShape::Standard => {
                self.normalize_phone(&mut record, PHONE_PRIVATE, MOBILE_ATHLETE, row, &mut warnings);
                self.normalize_phone(&mut record, PHONE_MOBILE, MOBILE_MOTHER, row, &mut warnings);
                self.normalize_phone(&mut record, PHONE_BUSINESS, MOBILE_FATHER, row, &mut warnings);
            }
            RecordShape::TrialTraining => {
                let emergency = record.get(EMERGENCY_PHONE).unwrap_or_default().to_string();
                record.set(PHONE_PRIVATE, emergency);
            }
        }

        if self.shape == RecordShape::Standard {
            let (primary, alternate) = consolidate_email([
                record.get(EMAIL_ATHLETE),
                record.get(EMAIL_MOTHER),
                record.get(EMAIL_FATHER),
            ]);
            let (primary, alternate) = (
                primary.unwrap_or_default().to_string(),
                alternate.unwrap_or_default().to_string(),
            );
            if primary.is_empty() {
                warnings.push(Warning::new(
                    row,
                    "Keine E-Mail Adresse gefunden für Athlet:in, Mutter oder Vater",
                ));
            }
            record.set(EMAIL, primary);
            record.set(EMAIL_ALTERNATE, alternate);
        }

        // An invalid number is reported but left as entered
        match ahv::validate(record.get(NATIONAL_ID)) {
            Ok(formatted) => record.set(NATIONAL_ID, formatted),
            Err(e) => warnings.push(Warning::new(row, e.to_string())),
        }

        match self.shape {
            RecordShape::TrialTraining => {
                record.set(REMARKS, derive::trial_remark(self.run_time.today));
            }
            RecordShape::Standard => record.set(REMARKS, ""),
        }

        record.set(PROCESSED_AT, self.run_time.timestamp());

        debug!(row, warnings = warnings.len(), "row transformed");
        (
            OutputRow::project(&record, self.shape.headers(), row),
            warnings,
        )
    }

    fn set_derived<E: std::fmt::Display>(
        &self,
        record: &mut Record,
        field: &str,
        value: Result<String, E>,
        row: usize,
        warnings: &mut Vec<Warning>,
    ) {
        match value {
            Ok(v) => record.set(field, v),
            Err(e) => {
                record.set(field, "");
                warnings.push(Warning::new(row, e.to_string()));
            }
        }
    }

    /// Format `source` into `target`; unreadable numbers are kept as entered
    fn normalize_phone(
        &self,
        record: &mut Record,
        target: &str,
        source: &str,
        row: usize,
        warnings: &mut Vec<Warning>,
    ) {
        let raw = record.get(source).map(str::to_string);
        match phone::normalize(raw.as_deref()) {
            Ok(formatted) => record.set(target, formatted),
            Err(e) => {
                warnings.push(Warning::new(row, format!("{}: {}", source, e)));
                record.set(target, raw.unwrap_or_default());
            }
        }
    }
}

/// Runs the transformer over a whole dataset
pub struct DatasetProcessor {
    run_time: RunTime,
    parallel: bool,
}

impl Default for DatasetProcessor {
    fn default() -> Self {
        Self::new(RunTime::now())
    }
}

impl DatasetProcessor {
    /// Create a processor stamping rows with `run_time`
    pub fn new(run_time: RunTime) -> Self {
        Self {
            run_time,
            parallel: true,
        }
    }

    /// Transform rows on the rayon pool (output order is unaffected)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Detect the shape from `columns` and transform every row in order
    pub fn process<S: AsRef<str>>(&self, rows: &[RawRow], columns: &[S]) -> ProcessedDataset {
        let shape = RecordShape::detect(columns);
        debug!(%shape, columns = columns.len(), "detected record shape");

        let transformer = RecordTransformer::new(shape, self.run_time);
        let results: Vec<(OutputRow, Vec<Warning>)> = if self.parallel {
            rows.par_iter()
                .enumerate()
                .map(|(i, raw)| transformer.transform(raw, i + 1))
                .collect()
        } else {
            rows.iter()
                .enumerate()
                .map(|(i, raw)| transformer.transform(raw, i + 1))
                .collect()
        };

        let (rows, warnings): (Vec<_>, Vec<_>) = results.into_iter().unzip();
        let shape = transformer.shape();
        let dataset = ProcessedDataset {
            shape,
            headers: shape.headers().iter().map(|h| h.to_string()).collect(),
            rows,
            warnings: warnings.into_iter().flatten().collect(),
        };

        info!(
            %shape,
            rows = dataset.row_count(),
            warnings = dataset.warnings.len(),
            "dataset processed"
        );
        dataset
    }
}

/// Convenience function to process a decoded dataset
pub fn process(dataset: &RawDataset, config: &Config) -> ProcessedDataset {
    DatasetProcessor::new(RunTime::now())
        .with_parallel(config.parallel)
        .process(&dataset.rows, &dataset.columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run_time() -> RunTime {
        RunTime::at(Utc.with_ymd_and_hms(2024, 3, 5, 13, 30, 0).unwrap())
    }

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    fn standard_row(gender: &str, ahv: &str) -> RawRow {
        row(&[
            ("Vorname", " Anna "),
            ("Nachname", "Muster"),
            ("Geschlecht", gender),
            ("Erhalten am", "05.03.2024 14:30:00"),
            ("Mitgliedschaft", "Jugendmitglied (U16-U20)"),
            ("Notfallnummer", "079 123 45 67"),
            ("AHV-Nummer (756.xxxx.xxxx.xx)", ahv),
            ("Email Athlet:in", "anna@example.ch"),
            ("Email Mutter", ""),
            ("Email Vater", "vater@example.ch"),
            ("Bemerkungen", "bitte anrufen"),
        ])
    }

    fn trial_row() -> RawRow {
        row(&[
            ("Vorname Athlet:in", "Lea"),
            ("Nachname Athlet:in", "Beispiel"),
            ("Geschlecht Athlet:in", "weiblich"),
            ("Geburtsdatum Athlet:in", "01.02.2014"),
            ("E-Mail Erziehungsberechtigte", "eltern@example.ch"),
            ("Notfallnummer", "0611234567"),
            ("Datum Schnuppertraining", "12.03.2024"),
            ("Bemerkungen", "kommt mit Schwester"),
        ])
    }

    #[test]
    fn test_consolidate_email() {
        assert_eq!(
            consolidate_email([Some("a@x"), Some(""), Some("f@x")]),
            (Some("a@x"), Some("f@x"))
        );
        assert_eq!(
            consolidate_email([None, Some("m@x"), Some("f@x")]),
            (Some("m@x"), Some("f@x"))
        );
        assert_eq!(
            consolidate_email([Some(""), None, Some("f@x")]),
            (Some("f@x"), None)
        );
        assert_eq!(consolidate_email([Some(""), Some(""), None]), (None, None));
    }

    #[test]
    fn test_standard_row() {
        let transformer = RecordTransformer::new(RecordShape::Standard, run_time());
        let (out, warnings) = transformer.transform(&standard_row("weiblich", "7561234567897"), 1);

        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(out.get(SALUTATION), Some("Frau"));
        assert_eq!(out.get(GREETING), Some(GREETING_PLACEHOLDER));
        assert_eq!(out.get(FIRST_NAME), Some("Anna"));
        assert_eq!(out.get(ENTRY_DATE), Some("05.03.2024"));
        assert_eq!(out.get(STATUS), Some("Jugendmitglied"));
        assert_eq!(out.get(EMERGENCY_PHONE), Some("079 123 45 67"));
        assert_eq!(out.get(NATIONAL_ID), Some("756.1234.5678.97"));
        assert_eq!(out.get(EMAIL), Some("anna@example.ch"));
        assert_eq!(out.get(EMAIL_ALTERNATE), Some("vater@example.ch"));
        assert_eq!(out.get(EMAIL_FATHER), Some("vater@example.ch"));
        assert_eq!(out.get(PHONE_PRIVATE), Some(""));
        assert_eq!(out.get(REMARKS), Some(""));
        assert_eq!(out.get(NATIONALITY), Some(""));
        assert_eq!(out.processed_at, "2024-03-05T13:30:00.000Z");
    }

    #[test]
    fn test_output_has_exactly_header_fields() {
        for (shape, raw) in [
            (RecordShape::Standard, standard_row("männlich", "")),
            (RecordShape::TrialTraining, trial_row()),
            (RecordShape::Standard, RawRow::new()),
            (RecordShape::TrialTraining, RawRow::new()),
        ] {
            let (out, _) = RecordTransformer::new(shape, run_time()).transform(&raw, 1);
            let keys: Vec<&str> = out.fields.keys().map(String::as_str).collect();
            assert_eq!(keys, shape.headers().to_vec());
        }
    }

    #[test]
    fn test_bad_salutation_leaves_field_empty_with_one_warning() {
        let transformer = RecordTransformer::new(RecordShape::Standard, run_time());
        for gender in ["", "divers"] {
            let (out, warnings) = transformer.transform(&standard_row(gender, "7561234567897"), 2);
            assert_eq!(out.get(SALUTATION), Some(""));
            assert_eq!(warnings.len(), 1, "{:?}", warnings);
            assert_eq!(warnings[0].row, 2);
        }

        let mut raw = standard_row("weiblich", "7561234567897");
        raw.insert("Geschlecht", None);
        let (out, warnings) = transformer.transform(&raw, 2);
        assert_eq!(out.get(SALUTATION), Some(""));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_bad_checksum_keeps_trimmed_raw_value() {
        let transformer = RecordTransformer::new(RecordShape::Standard, run_time());
        let (out, warnings) = transformer.transform(&standard_row("weiblich", " 756.1234.5678.90 "), 3);

        assert_eq!(out.get(NATIONAL_ID), Some("756.1234.5678.90"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("Ungültige AHV-Nummer"));
    }

    #[test]
    fn test_missing_email_warns() {
        let transformer = RecordTransformer::new(RecordShape::Standard, run_time());
        let mut raw = standard_row("weiblich", "7561234567897");
        raw.insert("Email Athlet:in", Some(String::new()));
        raw.insert("Email Vater", None);

        let (out, warnings) = transformer.transform(&raw, 1);
        assert_eq!(out.get(EMAIL), Some(""));
        assert_eq!(out.get(EMAIL_ALTERNATE), Some(""));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("Keine E-Mail Adresse"));
    }

    #[test]
    fn test_bad_phone_degrades_to_warning() {
        let transformer = RecordTransformer::new(RecordShape::Standard, run_time());
        let mut raw = standard_row("weiblich", "7561234567897");
        raw.insert("Mobiltelefon Mutter", Some(" unbekannt ".to_string()));

        let (out, warnings) = transformer.transform(&raw, 1);
        assert_eq!(out.get(PHONE_MOBILE), Some("unbekannt"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("Mobiltelefon Mutter: Ungültige Telefonnummer"));
    }

    #[test]
    fn test_trial_training_row() {
        let transformer = RecordTransformer::new(RecordShape::TrialTraining, run_time());
        assert_eq!(transformer.shape(), RecordShape::TrialTraining);
        let (out, warnings) = transformer.transform(&trial_row(), 1);

        assert_eq!(out.get(SALUTATION), Some("Frau"));
        assert_eq!(out.get(FIRST_NAME), Some("Lea"));
        assert_eq!(out.get(BIRTH_DATE), Some("01.02.2014"));
        assert_eq!(out.get(EMAIL), Some("eltern@example.ch"));
        assert_eq!(out.get(EMERGENCY_PHONE), Some("061 123 45 67"));
        assert_eq!(out.get(PHONE_PRIVATE), Some("061 123 45 67"));
        assert_eq!(out.get(REMARKS), Some("Schnuppert ab 05.03.2024"));
        assert_eq!(out.get(STATUS), None);
        // no AHV number on the form
        assert_eq!(warnings, vec![Warning::new(1, "AHV-Nummer fehlt")]);
    }

    #[test]
    fn test_dataset_end_to_end() {
        let rows = vec![
            standard_row("weiblich", "756.1234.5678.97"),
            standard_row("männlich", "756.1234.5678.90"),
            standard_row("", "7561234567897"),
        ];
        let columns = ["Vorname", "Geschlecht", "AHV-Nummer (756.xxxx.xxxx.xx)"];

        let result = DatasetProcessor::new(run_time()).process(&rows, &columns);

        assert_eq!(result.shape, RecordShape::Standard);
        assert_eq!(result.row_count(), 3);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0].row, 2);
        assert_eq!(result.warnings[1].row, 3);
        assert_eq!(result.rows[1].get(NATIONAL_ID), Some("756.1234.5678.90"));
        assert_eq!(result.rows[0].get(NATIONAL_ID), Some("756.1234.5678.97"));
        assert_eq!(result.headers.len(), RecordShape::Standard.headers().len());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows: Vec<RawRow> = (0..50)
            .map(|i| {
                if i % 3 == 0 {
                    standard_row("divers", "756.1234.5678.90")
                } else {
                    standard_row("weiblich", "7561234567897")
                }
            })
            .collect();
        let columns = ["Vorname"];

        let parallel = DatasetProcessor::new(run_time()).process(&rows, &columns);
        let sequential = DatasetProcessor::new(run_time())
            .with_parallel(false)
            .process(&rows, &columns);

        assert_eq!(parallel.rows, sequential.rows);
        assert_eq!(parallel.warnings, sequential.warnings);
        assert_eq!(parallel.warnings.len(), 34);
    }

    #[test]
    fn test_trial_training_detected_from_columns() {
        let columns = ["Vorname Athlet:in", "Datum Schnuppertraining"];
        let result = DatasetProcessor::new(run_time()).process(&[trial_row()], &columns);
        assert_eq!(result.shape, RecordShape::TrialTraining);
        assert_eq!(result.rows[0].get(REMARKS), Some("Schnuppert ab 05.03.2024"));
        assert_eq!(result.rows[0].get(FIRST_NAME), Some("Lea"));
    }
}
