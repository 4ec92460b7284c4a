use std::fs;

use tempfile::TempDir;

use sigvival::error::SigvivalError;
use sigvival::io::plot_png::render_km_png;
use sigvival::io::score_csv::{read_scores_csv, write_scores_csv};
use sigvival::scores::{ScoreRow, ScoreTable};
use sigvival::survival::{FigureCurve, KmFigure};

fn table() -> ScoreTable {
    let rows = [("TCGA-01", 1523.25, 0.412), ("TCGA-02", -310.5, -0.0838), ("TCGA-03", 0.0, 0.0)]
        .iter()
        .map(|&(sample, es, nes)| ScoreRow {
            sample: sample.to_string(),
            signature: "HYPOXIA".to_string(),
            es,
            nes,
        })
        .collect();
    ScoreTable {
        signature: "HYPOXIA".to_string(),
        rows,
    }
}

#[test]
fn score_csv_has_fixed_header_and_round_trips() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("scores.csv");
    write_scores_csv(&path, &table()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().next().unwrap(), "sample,signature,es,nes");
    assert_eq!(content.lines().count(), 4);

    let back = read_scores_csv(&path).unwrap();
    assert_eq!(back.signature, "HYPOXIA");
    for (a, b) in back.rows.iter().zip(table().rows.iter()) {
        assert_eq!(a.sample, b.sample);
        assert!((a.nes - b.nes).abs() < 1e-12);
        assert!((a.es - b.es).abs() < 1e-9);
    }
}

#[test]
fn unwritable_destination_is_write_error() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();
    let err = write_scores_csv(&blocker.join("scores.csv"), &table()).unwrap_err();
    assert!(matches!(err, SigvivalError::WriteError { .. }), "{err}");
}

fn figure() -> KmFigure {
    KmFigure {
        title: "HYPOXIA  P=0.0123, HR=1.8000".to_string(),
        legend_title: "NES".to_string(),
        x_label: "Time (days)".to_string(),
        y_label: "Survival probability".to_string(),
        max_time: 100.0,
        curves: vec![
            FigureCurve {
                label: "Low: below median".to_string(),
                path: vec![(0.0, 1.0), (40.0, 1.0), (40.0, 0.8), (100.0, 0.8)],
                censor_marks: vec![(100.0, 0.8)],
            },
            FigureCurve {
                label: "High: above median".to_string(),
                path: vec![(0.0, 1.0), (20.0, 1.0), (20.0, 0.5), (60.0, 0.5), (60.0, 0.2)],
                censor_marks: vec![],
            },
        ],
    }
}

#[test]
fn km_plot_is_written_as_png() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plot.png");
    render_km_png(&path, &figure()).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn km_plot_into_missing_directory_is_write_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("missing").join("plot.png");
    let err = render_km_png(&path, &figure()).unwrap_err();
    assert_eq!(err.kind(), "WriteError");
}
