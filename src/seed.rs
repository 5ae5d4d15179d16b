use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Days, Local, LocalResult, NaiveDateTime, TimeZone};
use lopdf::{
    Document as PdfDocument,
    Object,
    Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::error::{Error, Result};

/// Characters per line before body text is wrapped.
const WRAP_WIDTH: usize = 90;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_LEFT: i64 = 50;
const TITLE_TOP: i64 = 740;

/// A sample report written by [`seed`].
#[derive(Debug, Clone, Copy)]
pub struct SampleReport {
    pub folder: &'static str,
    pub filename: &'static str,
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
    /// How long ago the report was last modified.
    pub days_ago: u64,
}

pub const SAMPLE_FOLDERS: &[&str] = &[
    "financial_reports",
    "marketing_analytics",
    "project_updates",
    "technical_docs",
    "hr_documents",
];

pub const SAMPLE_REPORTS: &[SampleReport] = &[
    SampleReport {
        folder: "financial_reports",
        filename: "Q1_2024_Revenue_Report.pdf",
        title: "Q1 2024 Revenue Analysis",
        paragraphs: &[
            "This quarterly revenue report provides comprehensive analysis of our financial performance.",
            "Total revenue for Q1 2024 reached $2.5 million, representing a 15% increase from Q4 2023.",
            "Key growth drivers include expansion in the enterprise segment and successful product launches.",
            "Operating expenses were controlled at $1.8 million, maintaining healthy profit margins.",
            "Cash flow remained positive throughout the quarter with strong collection rates.",
        ],
        days_ago: 45,
    },
    SampleReport {
        folder: "financial_reports",
        filename: "Budget_Forecast_2024.pdf",
        title: "Annual Budget Forecast 2024",
        paragraphs: &[
            "Annual budget planning document outlining financial projections for 2024.",
            "Projected revenue growth of 25% based on market expansion plans.",
            "Investment allocation: 40% R&D, 30% Sales & Marketing, 20% Operations, 10% Infrastructure.",
            "Risk factors include market volatility and supply chain disruptions.",
            "Contingency planning includes scenario analysis for various market conditions.",
        ],
        days_ago: 120,
    },
    SampleReport {
        folder: "marketing_analytics",
        filename: "Campaign_Performance_Jan2024.pdf",
        title: "January 2024 Marketing Campaign Results",
        paragraphs: &[
            "Monthly marketing campaign performance analysis and optimization recommendations.",
            "Digital advertising ROI improved to 3.2x with targeted audience segmentation.",
            "Social media engagement increased by 45% following content strategy revision.",
            "Email marketing conversion rates reached 8.5%, exceeding industry benchmarks.",
            "Lead generation pipeline shows strong correlation with brand awareness metrics.",
        ],
        days_ago: 60,
    },
    SampleReport {
        folder: "marketing_analytics",
        filename: "Customer_Segmentation_Study.pdf",
        title: "Customer Segmentation Analysis",
        paragraphs: &[
            "Comprehensive customer segmentation study using behavioral and demographic data.",
            "Identified five distinct customer personas with varying purchase patterns.",
            "Enterprise customers show highest lifetime value but longer sales cycles.",
            "SMB segment demonstrates quick adoption but requires different support strategies.",
            "Personalization opportunities exist across all segments for improved engagement.",
        ],
        days_ago: 30,
    },
    SampleReport {
        folder: "project_updates",
        filename: "Project_Alpha_Status.pdf",
        title: "Project Alpha - Weekly Status Update",
        paragraphs: &[
            "Weekly project status update for Project Alpha development initiative.",
            "Development milestone achieved: core functionality implementation completed.",
            "Testing phase initiated with automated test coverage at 85%.",
            "Integration challenges identified with legacy systems requiring additional work.",
            "Timeline remains on track for Q2 2024 launch with minor scope adjustments.",
        ],
        days_ago: 7,
    },
    SampleReport {
        folder: "project_updates",
        filename: "Infrastructure_Upgrade_Plan.pdf",
        title: "Infrastructure Modernization Plan",
        paragraphs: &[
            "Strategic plan for modernizing IT infrastructure and cloud migration.",
            "Phase 1: Database migration to cloud-native solutions by Q3 2024.",
            "Phase 2: Application containerization and microservices architecture.",
            "Security enhancements include zero-trust network implementation.",
            "Cost analysis shows 30% reduction in operational expenses post-migration.",
        ],
        days_ago: 15,
    },
    SampleReport {
        folder: "technical_docs",
        filename: "API_Documentation_v2.pdf",
        title: "API Documentation Version 2.0",
        paragraphs: &[
            "Technical documentation for REST API version 2.0 implementation.",
            "Authentication methods include OAuth 2.0 and API key management.",
            "Rate limiting implemented to ensure system stability and fair usage.",
            "Response formats standardized with comprehensive error handling.",
            "SDK available in Python, JavaScript, and Java for developer integration.",
        ],
        days_ago: 25,
    },
    SampleReport {
        folder: "technical_docs",
        filename: "Security_Audit_Report.pdf",
        title: "Annual Security Audit Report",
        paragraphs: &[
            "Comprehensive security audit covering infrastructure, applications, and processes.",
            "Vulnerability assessment identified minimal critical issues, all addressed.",
            "Penetration testing results show robust defense mechanisms in place.",
            "Compliance verification for SOC 2 Type II and ISO 27001 standards.",
            "Recommendations include enhanced monitoring and incident response procedures.",
        ],
        days_ago: 90,
    },
    SampleReport {
        folder: "hr_documents",
        filename: "Employee_Handbook_2024.pdf",
        title: "Employee Handbook 2024 Edition",
        paragraphs: &[
            "Updated employee handbook covering policies, procedures, and benefits.",
            "Remote work guidelines and hybrid collaboration best practices.",
            "Professional development opportunities including training and certification programs.",
            "Health and wellness benefits expanded to include mental health support.",
            "Code of conduct and ethics guidelines for all team members.",
        ],
        days_ago: 100,
    },
    SampleReport {
        folder: "hr_documents",
        filename: "Recruitment_Strategy.pdf",
        title: "2024 Talent Acquisition Strategy",
        paragraphs: &[
            "Strategic approach to talent acquisition and retention for 2024.",
            "Focus on diversity, equity, and inclusion in hiring practices.",
            "Employer branding initiatives to attract top-tier candidates.",
            "Compensation benchmarking against industry standards completed.",
            "Onboarding process optimization for improved new hire experience.",
        ],
        days_ago: 50,
    },
];

/// What a [`seed`] run did.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub written: Vec<PathBuf>,
    /// Files that already existed and were left alone.
    pub skipped: Vec<PathBuf>,
}

/// Write the sample report set under `root`, creating folders as needed.
///
/// Each file's modification time is backdated by its `days_ago`. Existing
/// files are kept unless `force` is set.
pub fn seed(root: &Path, force: bool) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for folder in SAMPLE_FOLDERS {
        fs::create_dir_all(root.join(folder))?;
    }

    for (i, sample) in SAMPLE_REPORTS.iter().enumerate() {
        let path = root.join(sample.folder).join(sample.filename);
        if path.exists() && !force {
            tracing::debug!(path = %path.display(), "sample exists, skipping");
            report.skipped.push(path);
            continue;
        }

        let modified = backdated(sample.days_ago, i);
        let footer = format!(
            "Document created: {}",
            modified.format("%Y-%m-%d %H:%M:%S")
        );
        write_pdf(&path, sample.title, sample.paragraphs, &footer)?;
        set_modified(&path, modified)?;

        tracing::info!(path = %path.display(), "wrote sample report");
        report.written.push(path);
    }

    Ok(report)
}

/// Write a single-page PDF with a title, body paragraphs and a footer line.
pub fn write_pdf(
    path: &Path,
    title: &str,
    paragraphs: &[&str],
    footer: &str,
) -> Result<()> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 18.into()]),
        Operation::new("Td", vec![MARGIN_LEFT.into(), TITLE_TOP.into()]),
        Operation::new("Tj", vec![Object::string_literal(title)]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("Td", vec![0.into(), (-36).into()]),
    ];

    for paragraph in paragraphs {
        for line in wrap(paragraph, WRAP_WIDTH) {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line)],
            ));
            operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
        }
        operations.push(Operation::new("Td", vec![0.into(), (-10).into()]));
    }

    operations.push(Operation::new("Td", vec![0.into(), (-20).into()]));
    operations.push(Operation::new("Tj", vec![Object::string_literal(footer)]));
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id =
        doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            PAGE_WIDTH.into(),
            PAGE_HEIGHT.into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut file = fs::File::create(path)?;
    doc.save_to(&mut file)?;
    Ok(())
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// `days_ago` days before today at a fixed office-hours time derived from
/// `index`, so repeated runs produce the same timestamps on the same day.
fn backdated(days_ago: u64, index: usize) -> NaiveDateTime {
    let date = Local::now().date_naive() - Days::new(days_ago);
    let hour = 8 + (index % 10) as u32;
    let minute = (index * 17 % 60) as u32;
    date.and_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn set_modified(path: &Path, when: NaiveDateTime) -> Result<()> {
    let time = system_time(Local.from_local_datetime(&when), when)?;
    fs::File::options().write(true).open(path)?.set_modified(time)?;
    Ok(())
}

/// Pick the earlier instant for an ambiguous local time; a time that falls
/// in a DST gap is an error.
fn system_time<Tz: TimeZone>(
    local: LocalResult<DateTime<Tz>>,
    when: NaiveDateTime,
) -> Result<SystemTime> {
    local.earliest().map(SystemTime::from).ok_or_else(|| {
        Error::Config(format!("local time {when} does not exist"))
    })
}
