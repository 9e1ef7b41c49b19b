//! Parametrisation tables for every check, and the case ids derived from them.

use std::fmt;

use clap::ValueEnum;

use crate::contract::{OutputFormat, Strategy};

/// Reference document for the strategy and table checks.
pub const REFERENCE_PDF: &str = "layout-parser-paper.pdf";
pub const REFERENCE_PDF_CONTENT_TYPE: &str = "application/pdf";
/// Text found in the first table the service renders for the reference PDF.
pub const EXPECTED_TABLE_FRAGMENT: &str = "Layouts of history";
/// Concatenated element text must be strictly longer than this.
pub const MIN_TEXT_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CheckKind {
    HappyPath,
    GzipSending,
    StrategyPerformance,
    TableSupport,
    GzipRoundTrip,
}

impl CheckKind {
    pub fn all() -> &'static [CheckKind] {
        &[
            CheckKind::HappyPath,
            CheckKind::GzipSending,
            CheckKind::StrategyPerformance,
            CheckKind::TableSupport,
            CheckKind::GzipRoundTrip,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::HappyPath => "happy_path",
            CheckKind::GzipSending => "gzip_sending",
            CheckKind::StrategyPerformance => "strategy_performance",
            CheckKind::TableSupport => "table_support",
            CheckKind::GzipRoundTrip => "gzip_round_trip",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct HappyPathCase {
    pub filename: &'static str,
    pub content_type: &'static str,
    /// Image and PDF partitioning run the layout model.
    pub requires_inference: bool,
}

const fn happy(filename: &'static str, content_type: &'static str) -> HappyPathCase {
    HappyPathCase {
        filename,
        content_type,
        requires_inference: false,
    }
}

const fn happy_inference(filename: &'static str, content_type: &'static str) -> HappyPathCase {
    HappyPathCase {
        filename,
        content_type,
        requires_inference: true,
    }
}

/// One sample per supported format, sorted by file type.
pub const HAPPY_PATH_CASES: &[HappyPathCase] = &[
    happy("stanley-cups.csv", "application/csv"),
    happy("fake.doc", "application/msword"),
    happy(
        "fake.docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    happy("alert.eml", "message/rfc822"),
    happy("announcement.eml", "message/rfc822"),
    happy("fake-email-attachment.eml", "message/rfc822"),
    happy("fake-email-image-embedded.eml", "message/rfc822"),
    happy("fake-email.eml", "message/rfc822"),
    happy("family-day.eml", "message/rfc822"),
    happy("winter-sports.epub", "application/epub"),
    happy("fake-html.html", "text/html"),
    happy_inference("layout-parser-paper-fast.jpg", "image/jpeg"),
    happy("spring-weather.html.json", "application/json"),
    happy("README.md", "text/markdown"),
    happy("fake-email.msg", "application/x-ole-storage"),
    happy("fake.odt", "application/vnd.oasis.opendocument.text"),
    happy_inference("layout-parser-paper.pdf", "application/pdf"),
    happy("fake-power-point.ppt", "application/vnd.ms-powerpoint"),
    happy(
        "fake-power-point.pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    happy("README.rst", "text/prs.fallenstein.rst"),
    happy("fake-doc.rtf", "application/rtf"),
    happy("fake-text.txt", "text/plain"),
    happy("stanley-cups.tsv", "text/tab-separated-values"),
    happy(
        "stanley-cups.xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    happy("fake-xml.xml", "text/xml"),
    happy("layout-parser-paper.pdf.gz", "application/gzip"),
];

#[derive(Debug, PartialEq, Eq)]
pub struct GzipCase {
    pub to_gzip: &'static [&'static str],
    pub verbatim: &'static [&'static str],
    /// Empty means the service must detect the type after decompressing.
    pub uncompressed_content_type: &'static str,
}

pub const GZIP_CASES: &[GzipCase] = &[
    GzipCase {
        to_gzip: &["fake-html.html"],
        verbatim: &[],
        uncompressed_content_type: "text/html",
    },
    GzipCase {
        to_gzip: &["stanley-cups.csv"],
        verbatim: &[],
        uncompressed_content_type: "application/csv",
    },
    GzipCase {
        to_gzip: &["fake.doc"],
        verbatim: &[],
        uncompressed_content_type: "application/msword",
    },
    GzipCase {
        to_gzip: &["layout-parser-paper-fast.pdf"],
        verbatim: &["list-item-example.pdf"],
        uncompressed_content_type: "application/pdf",
    },
    GzipCase {
        to_gzip: &["fake-email.eml"],
        verbatim: &["fake-email-image-embedded.eml"],
        uncompressed_content_type: "message/rfc822",
    },
    GzipCase {
        to_gzip: &["layout-parser-paper-fast.pdf"],
        verbatim: &["list-item-example.pdf"],
        uncompressed_content_type: "",
    },
    GzipCase {
        to_gzip: &["fake-email.eml"],
        verbatim: &["fake-email-image-embedded.eml"],
        uncompressed_content_type: "",
    },
];

pub const GZIP_OUTPUT_FORMATS: &[OutputFormat] = &[OutputFormat::Json, OutputFormat::Csv];

#[derive(Debug, PartialEq, Eq)]
pub struct TableCase {
    pub strategy: Strategy,
    pub skip_infer_table_types: &'static [&'static str],
    pub expected_tables: usize,
}

pub const TABLE_CASES: &[TableCase] = &[
    TableCase {
        strategy: Strategy::Fast,
        skip_infer_table_types: &[],
        expected_tables: 0,
    },
    TableCase {
        strategy: Strategy::Fast,
        skip_infer_table_types: &["pdf"],
        expected_tables: 0,
    },
    TableCase {
        strategy: Strategy::HiRes,
        skip_infer_table_types: &[],
        expected_tables: 2,
    },
    TableCase {
        strategy: Strategy::HiRes,
        skip_infer_table_types: &["pdf"],
        expected_tables: 0,
    },
];

#[derive(Debug, PartialEq, Eq)]
pub struct RoundTripCase {
    pub filename: &'static str,
    pub content_type: &'static str,
}

pub const ROUND_TRIP_CASES: &[RoundTripCase] = &[
    RoundTripCase {
        filename: "fake-html.html",
        content_type: "text/html",
    },
    RoundTripCase {
        filename: "stanley-cups.csv",
        content_type: "application/csv",
    },
    RoundTripCase {
        filename: "fake-email.eml",
        content_type: "message/rfc822",
    },
];

/// A single runnable case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmokeCase {
    HappyPath(&'static HappyPathCase),
    GzipSending {
        case: &'static GzipCase,
        output_format: OutputFormat,
    },
    StrategyPerformance,
    TableSupport(&'static TableCase),
    GzipRoundTrip(&'static RoundTripCase),
}

impl SmokeCase {
    pub fn kind(&self) -> CheckKind {
        match self {
            SmokeCase::HappyPath(_) => CheckKind::HappyPath,
            SmokeCase::GzipSending { .. } => CheckKind::GzipSending,
            SmokeCase::StrategyPerformance => CheckKind::StrategyPerformance,
            SmokeCase::TableSupport(_) => CheckKind::TableSupport,
            SmokeCase::GzipRoundTrip(_) => CheckKind::GzipRoundTrip,
        }
    }

    /// Cases that cannot run on emulated architectures.
    pub fn requires_inference(&self) -> bool {
        match self {
            SmokeCase::HappyPath(case) => case.requires_inference,
            SmokeCase::StrategyPerformance | SmokeCase::TableSupport(_) => true,
            SmokeCase::GzipSending { .. } | SmokeCase::GzipRoundTrip(_) => false,
        }
    }

    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SmokeCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind().as_str();
        match self {
            SmokeCase::HappyPath(case) => write!(f, "{kind}[{}]", case.filename),
            SmokeCase::GzipSending {
                case,
                output_format,
            } => {
                let content_type = if case.uncompressed_content_type.is_empty() {
                    "detect"
                } else {
                    case.uncompressed_content_type
                };
                write!(
                    f,
                    "{kind}[{}|{}|{}|{}]",
                    case.to_gzip.join(","),
                    case.verbatim.join(","),
                    content_type,
                    output_format
                )
            }
            SmokeCase::StrategyPerformance => f.write_str(kind),
            SmokeCase::TableSupport(case) => write!(
                f,
                "{kind}[{}|{}|{}]",
                case.strategy,
                case.skip_infer_table_types.join(","),
                case.expected_tables
            ),
            SmokeCase::GzipRoundTrip(case) => write!(f, "{kind}[{}]", case.filename),
        }
    }
}

/// Every case of the selected kinds, in execution order. No kinds means all.
pub fn select_cases(kinds: &[CheckKind]) -> Vec<SmokeCase> {
    let wanted = |kind: CheckKind| kinds.is_empty() || kinds.contains(&kind);
    let mut cases = Vec::new();

    if wanted(CheckKind::HappyPath) {
        cases.extend(HAPPY_PATH_CASES.iter().map(SmokeCase::HappyPath));
    }
    if wanted(CheckKind::GzipSending) {
        for case in GZIP_CASES {
            for &output_format in GZIP_OUTPUT_FORMATS {
                cases.push(SmokeCase::GzipSending {
                    case,
                    output_format,
                });
            }
        }
    }
    if wanted(CheckKind::StrategyPerformance) {
        cases.push(SmokeCase::StrategyPerformance);
    }
    if wanted(CheckKind::TableSupport) {
        cases.extend(TABLE_CASES.iter().map(SmokeCase::TableSupport));
    }
    if wanted(CheckKind::GzipRoundTrip) {
        cases.extend(ROUND_TRIP_CASES.iter().map(SmokeCase::GzipRoundTrip));
    }
    cases
}
