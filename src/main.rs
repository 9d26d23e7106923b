use std::sync::Arc;

use clap::Parser;
use vacancy_harvest::config::{CONFIG, FetchSettings};
use vacancy_harvest::data_models::{JobLevel, VacancyRecord};
use vacancy_harvest::fetcher::VacancyFetcher;
use vacancy_harvest::filters::{FilterCriteria, FilterEngine};
use vacancy_harvest::{persist, stats};

/// Search vacancies, narrow them down and print a summary.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Free-text search query (IT, Java, Python, ...)
    query: String,

    #[arg(long)]
    level: Option<JobLevel>,

    #[arg(long)]
    salary_from: Option<f64>,

    #[arg(long)]
    salary_to: Option<f64>,

    /// Canonical work format, e.g. "Remote work"
    #[arg(long)]
    work_format: Option<String>,

    #[arg(long)]
    region: Option<String>,

    /// Required skill, repeat for several
    #[arg(long = "skill")]
    skills: Vec<String>,

    /// Only vacancies published in the last N days
    #[arg(long)]
    days: Option<u32>,

    #[arg(long)]
    max_pages: Option<u32>,

    /// Save the unfiltered result as JSON in the working directory
    #[arg(long)]
    save: bool,
}

impl Args {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            level: self.level,
            salary_from: self.salary_from,
            salary_to: self.salary_to,
            work_format: self.work_format.clone(),
            region: self.region.clone(),
            skills: (!self.skills.is_empty())
                .then(|| self.skills.iter().map(|s| s.trim().to_string()).collect()),
            published_within_days: self.days,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut settings = FetchSettings::from_config(&CONFIG);
    if let Some(max_pages) = args.max_pages {
        settings.max_pages = max_pages;
    }
    let fetcher = Arc::new(VacancyFetcher::new(settings)?);

    let vacancies = fetcher.search(&args.query).await;
    println!("Vacancies found: {}", vacancies.len());
    if vacancies.is_empty() {
        println!("No data to analyse");
        return Ok(());
    }

    if args.save {
        let file_name = persist::default_file_name(&args.query, chrono::Local::now());
        persist::save_to_json(&vacancies, &file_name)?;
        println!("Saved to {file_name}");
    }

    let criteria = args.criteria();
    let current = if criteria.is_empty() {
        vacancies
    } else {
        let filtered = FilterEngine::apply(&vacancies, &criteria);
        println!("After filtering: {}", filtered.len());
        filtered
    };

    for vacancy in current.iter().take(5) {
        print_vacancy(vacancy);
    }
    print_stats(&current);
    Ok(())
}

fn print_vacancy(vacancy: &VacancyRecord) {
    let bound = |b: Option<f64>| b.map(|v| format!("{v:.0}")).unwrap_or_else(|| "-".into());
    println!("\n{}", "=".repeat(50));
    println!("Title:   {}", vacancy.title);
    println!("Company: {}", vacancy.company);
    println!("Level:   {}", vacancy.level);
    println!(
        "Salary:  {} - {} {}",
        bound(vacancy.salary.lower_bound),
        bound(vacancy.salary.upper_bound),
        vacancy.salary.currency
    );
    println!("Link:    {}", vacancy.url);
}

fn print_stats(records: &[VacancyRecord]) {
    println!("\n{}", "=".repeat(50));
    println!("Median salary by level:");
    for (level, median) in stats::median_salary_by_level(records) {
        println!("  {level:<8} {median:.0}");
    }
    println!("Levels:");
    for share in stats::level_distribution(records) {
        println!("  {:<8} {} ({:.1}%)", share.level, share.count, share.percent);
    }
    println!("Top skills:");
    for (skill, count) in stats::top_skills(records, 15) {
        println!("  {skill}: {count}");
    }
    println!("Work formats:");
    for (format, count) in stats::work_format_distribution(records) {
        println!("  {format}: {count}");
    }
    println!("Top regions:");
    for (region, count) in stats::top_regions(records, 15) {
        println!("  {region}: {count}");
    }
}
