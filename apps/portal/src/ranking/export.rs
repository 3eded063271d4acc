//! Report Exporter: serializes the sorted result set and the search parameters that
//! produced it into the downloadable CSV report.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::candidate::Candidate;
use crate::ranking::analytics::aggregate;
use crate::ranking::filters::FilterQuery;

pub const PDF_UNAVAILABLE: &str = "Exportación PDF coming soon! Por ahora usa CSV.";

const COLUMN_HEADERS: [&str; 16] = [
    "Ranking",
    "Nombre Completo",
    "Email",
    "Score",
    "Experiencia (años)",
    "Skills",
    "Required Matches",
    "Preferred Matches",
    "Job Description Matches",
    "Experiencia OK",
    "Ciudad",
    "Género",
    "Educación",
    "Distancia (km)",
    "CV ID",
    "User ID",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF export is not available yet")]
    PdfUnavailable,

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Pdf,
}

/// A finished report, ready to be downloaded or written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Builds the report in the requested format. PDF always reports that it is not yet
/// available instead of producing nothing.
pub fn export(
    format: ReportFormat,
    candidates: &[Candidate],
    query: &FilterQuery,
    now: DateTime<Utc>,
) -> Result<Report, ExportError> {
    match format {
        ReportFormat::Csv => csv_report(candidates, query, now),
        ReportFormat::Pdf => Err(ExportError::PdfUnavailable),
    }
}

/// `hr-ranking-<YYYY-MM-DD>.csv`, dated in UTC.
pub fn report_filename(now: DateTime<Utc>) -> String {
    format!("hr-ranking-{}.csv", now.format("%Y-%m-%d"))
}

/// Metadata block, blank separator row, column headers, then one row per candidate in
/// the order given. Every field is quoted and embedded quotes are doubled.
pub fn csv_report(
    candidates: &[Candidate],
    query: &FilterQuery,
    now: DateTime<Utc>,
) -> Result<Report, ExportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let exported_at = now.with_timezone(&Local).format("%-d/%-m/%Y, %H:%M:%S").to_string();
    for (name, value) in metadata_rows(query, &exported_at, candidates.len()) {
        writer.write_record([name, value.as_str()])?;
    }
    writer.write_record(["", ""])?;
    writer.write_record(COLUMN_HEADERS)?;

    for (index, candidate) in candidates.iter().enumerate() {
        writer.write_record(candidate_row(index + 1, candidate))?;
    }

    let mut body = writer
        .into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
    // Rows are newline-joined; no terminator after the last one.
    if body.last() == Some(&b'\n') {
        body.pop();
    }

    Ok(Report {
        filename: report_filename(now),
        content_type: "text/csv; charset=utf-8",
        body,
    })
}

fn metadata_rows(
    query: &FilterQuery,
    exported_at: &str,
    total: usize,
) -> Vec<(&'static str, String)> {
    let or_default = |value: &str, fallback: &str| {
        if value.trim().is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };

    vec![
        ("Búsqueda HR Selector", String::new()),
        ("Skills Requeridas", query.required_skills_raw.clone()),
        ("Skills Preferidas", query.preferred_skills_raw.clone()),
        (
            "Experiencia Mínima",
            format!("{} años", query.min_experience_or_zero()),
        ),
        ("Género", or_default(&query.gender, "Todos")),
        ("Ciudades", or_default(&query.cities_raw, "Todas")),
        (
            "Distancia Máxima",
            format!("{} km", or_default(&query.max_distance_km, "N/A")),
        ),
        ("Descripción del Puesto", query.job_description.clone()),
        ("Fecha de Exportación", exported_at.to_string()),
        ("Total Candidatos", total.to_string()),
    ]
}

fn candidate_row(ranking: usize, c: &Candidate) -> [String; 16] {
    let distance = match c.reasons.distance_km {
        Some(km) if km != 0.0 => km.to_string(),
        _ => String::new(),
    };

    [
        ranking.to_string(),
        c.full_name.clone(),
        c.email.clone(),
        format!("{:.2}", c.score),
        c.experience_years.to_string(),
        c.skills.join("; "),
        c.reasons.required_matches.to_string(),
        c.reasons.preferred_matches.to_string(),
        c.reasons.job_description_matches.to_string(),
        if c.reasons.experience_ok { "Sí" } else { "No" }.to_string(),
        c.city.clone().unwrap_or_default(),
        c.gender.clone().unwrap_or_default(),
        c.education.join("; "),
        distance,
        c.cv_id.clone(),
        c.user_id.clone(),
    ]
}

/// Writes the report into `dir` through a temporary file that is renamed into place, so a
/// failed export never leaves a partial file behind.
pub fn save_report(dir: &Path, report: &Report) -> Result<PathBuf, ExportError> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&report.body)?;
    tmp.as_file().sync_all()?;

    let target = dir.join(&report.filename);
    tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;

    info!("Saved report {} ({} bytes)", target.display(), report.body.len());
    Ok(target)
}

/// Short plain-text summary of a search, for pasting into chat or email.
pub fn share_summary(candidates: &[Candidate], query: &FilterQuery) -> String {
    let or_na = |value: &str| {
        if value.trim().is_empty() {
            "N/A".to_string()
        } else {
            value.to_string()
        }
    };

    format!(
        "Resultados de Búsqueda - HR Selector\n\n\
         Encontré {} candidatos con los siguientes filtros:\n\
         • Required: {}\n\
         • Preferred: {}\n\
         • Experiencia: {}+ años\n\
         • Score promedio: {:.2}",
        candidates.len(),
        or_na(&query.required_skills_raw),
        or_na(&query.preferred_skills_raw),
        query.min_experience_or_zero(),
        aggregate(candidates).avg_score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::make_candidate;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap()
    }

    fn render(candidates: &[Candidate], query: &FilterQuery) -> String {
        let report = csv_report(candidates, query, fixed_now()).unwrap();
        String::from_utf8(report.body).unwrap()
    }

    fn lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    #[test]
    fn test_filename_uses_iso_date() {
        assert_eq!(report_filename(fixed_now()), "hr-ranking-2026-03-09.csv");
    }

    #[test]
    fn test_embedded_quotes_are_doubled_and_skills_joined() {
        let mut c = make_candidate("A \"B\"", 7.5, 3.0);
        c.skills = vec!["x".to_string(), "y".to_string()];
        let text = render(&[c], &FilterQuery::default());
        let last = *lines(&text).last().unwrap();
        assert!(last.contains(r#""A ""B""""#), "row was {last}");
        assert!(last.contains(r#""x; y""#));
        assert!(last.contains(r#""7.50""#));
    }

    #[test]
    fn test_layout_metadata_separator_headers_rows() {
        let candidates = vec![make_candidate("Ana", 9.0, 4.0), make_candidate("Bob", 6.0, 2.0)];
        let query = FilterQuery {
            required_skills_raw: "node, react".to_string(),
            min_experience: Some(3.0),
            ..Default::default()
        };
        let text = render(&candidates, &query);
        let rows = lines(&text);

        assert_eq!(rows.len(), 10 + 1 + 1 + 2);
        assert_eq!(rows[0], r#""Búsqueda HR Selector","""#);
        assert_eq!(rows[1], r#""Skills Requeridas","node, react""#);
        assert_eq!(rows[3], r#""Experiencia Mínima","3 años""#);
        assert_eq!(rows[4], r#""Género","Todos""#);
        assert_eq!(rows[5], r#""Ciudades","Todas""#);
        assert_eq!(rows[6], r#""Distancia Máxima","N/A km""#);
        assert!(rows[8].starts_with(r#""Fecha de Exportación","#));
        assert_eq!(rows[9], r#""Total Candidatos","2""#);
        assert_eq!(rows[10], r#""","""#);
        assert!(rows[11].starts_with(r#""Ranking","Nombre Completo","Email","Score""#));
        assert!(rows[11].ends_with(r#""CV ID","User ID""#));
        assert!(rows[12].starts_with(r#""1","Ana""#));
        assert!(rows[13].starts_with(r#""2","Bob""#));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_row_defaults_for_sparse_candidate() {
        let c = make_candidate("Eve", 5.0, 0.0);
        let row = candidate_row(1, &c);
        assert_eq!(row[3], "5.00");
        assert_eq!(row[4], "0");
        assert_eq!(row[6], "0");
        assert_eq!(row[9], "No");
        assert_eq!(row[10], "");
        assert_eq!(row[13], "");
    }

    #[test]
    fn test_row_with_reasons() {
        let mut c = make_candidate("Ana", 8.126, 4.5);
        c.reasons.required_matches = 2;
        c.reasons.experience_ok = true;
        c.reasons.distance_km = Some(12.5);
        c.education = vec!["UBA".to_string(), "UTN".to_string()];
        c.city = Some("Rosario".to_string());
        let row = candidate_row(3, &c);
        assert_eq!(row[0], "3");
        assert_eq!(row[3], "8.13");
        assert_eq!(row[4], "4.5");
        assert_eq!(row[6], "2");
        assert_eq!(row[9], "Sí");
        assert_eq!(row[10], "Rosario");
        assert_eq!(row[12], "UBA; UTN");
        assert_eq!(row[13], "12.5");
    }

    #[test]
    fn test_zero_distance_is_blank() {
        let mut c = make_candidate("Ana", 8.0, 1.0);
        c.reasons.distance_km = Some(0.0);
        assert_eq!(candidate_row(1, &c)[13], "");
    }

    #[test]
    fn test_empty_set_produces_header_only_document() {
        let text = render(&[], &FilterQuery::default());
        let rows = lines(&text);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[9], r#""Total Candidatos","0""#);
    }

    #[test]
    fn test_pdf_is_reported_unavailable() {
        let err = export(ReportFormat::Pdf, &[], &FilterQuery::default(), fixed_now()).unwrap_err();
        assert!(matches!(err, ExportError::PdfUnavailable));
    }

    #[test]
    fn test_save_report_writes_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = csv_report(&[make_candidate("Ana", 9.0, 1.0)], &FilterQuery::default(), fixed_now())
            .unwrap();
        let path = save_report(dir.path(), &report).unwrap();
        assert_eq!(path.file_name().unwrap(), "hr-ranking-2026-03-09.csv");
        assert_eq!(std::fs::read(&path).unwrap(), report.body);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_report_into_missing_dir_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let report = csv_report(&[], &FilterQuery::default(), fixed_now()).unwrap();
        assert!(save_report(&missing, &report).is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_share_summary() {
        let candidates = vec![make_candidate("a", 8.0, 1.0), make_candidate("b", 7.0, 1.0)];
        let query = FilterQuery {
            required_skills_raw: "rust".to_string(),
            min_experience: Some(2.0),
            ..Default::default()
        };
        let text = share_summary(&candidates, &query);
        assert!(text.contains("Encontré 2 candidatos"));
        assert!(text.contains("• Required: rust"));
        assert!(text.contains("• Preferred: N/A"));
        assert!(text.contains("• Experiencia: 2+ años"));
        assert!(text.ends_with("• Score promedio: 7.50"));
    }
}
