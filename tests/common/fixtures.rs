//! Test fixtures for integration tests.

use std::sync::Arc;

use career_match::{
    CareerCoachMatcher, Ingestor, MatcherConfig, MiniLmEmbedder, MockVectorIndex,
};

pub type TestMatcher = CareerCoachMatcher<MiniLmEmbedder, MockVectorIndex>;

pub const JOBS_CSV: &str = "\
Job Title,Job Description
Cloud Engineer,\"Design, automate and operate AWS cloud infrastructure using Kubernetes, Docker and Terraform. Python scripting for automation.\"
Retail Cashier,\"Operate the cash register, greet customers, handle returns and keep shelves stocked in a busy retail store.\"
Financial Analyst,\"Build financial models, forecast budgets, analyse variance and report to finance leadership.\"
HR Generalist,\"Own recruiting pipelines, onboarding, benefits administration and employee relations.\"
Data Engineer,\"Build Python and Spark data pipelines on AWS, maintain SQL warehouses and Docker based deployments.\"
,Orphan description without a title
Registered Nurse,
";

pub const RESUMES_CSV: &str = "\
resume_id,category,file_path,resume_text
10001,INFORMATION-TECHNOLOGY,data/INFORMATION-TECHNOLOGY/10001.pdf,\"Cloud engineer with six years of AWS, Kubernetes, Docker and Terraform. Automates infrastructure in Python.\"
10002,INFORMATION-TECHNOLOGY,data/INFORMATION-TECHNOLOGY/10002.pdf,\"Data engineer building Spark and Python pipelines on AWS with SQL warehouses.\"
10003,FINANCE,data/FINANCE/10003.pdf,\"Financial analyst: budgets, forecasting models and variance reporting for leadership.\"
10004,RETAIL,data/RETAIL/10004.pdf,\"Retail associate experienced with cash register, returns and customer service in a busy store.\"
10005,HR,data/HR/10005.pdf,\"Recruiter managing hiring pipelines, onboarding and benefits administration.\"
10006,,data/unknown/10006.pdf,\"Generalist with some Python scripting, spreadsheets and customer support.\"
10007,FINANCE,data/FINANCE/10007.pdf,short
";

pub const JOB_ROWS_VALID: usize = 5;
pub const RESUME_ROWS_VALID: usize = 6;

pub const CLOUD_RESUME: &str = "Senior cloud engineer: AWS, Kubernetes, Docker, Terraform and Python automation for production infrastructure.";

pub fn stub_embedder() -> Arc<MiniLmEmbedder> {
    Arc::new(MiniLmEmbedder::stub().expect("stub embedder should load"))
}

/// Matcher over an in-memory index loaded from the CSV fixtures.
pub async fn seeded_matcher() -> TestMatcher {
    seeded_matcher_with(MatcherConfig::default()).await
}

pub async fn seeded_matcher_with(config: MatcherConfig) -> TestMatcher {
    let embedder = stub_embedder();
    let index = Arc::new(MockVectorIndex::new());

    let ingestor = Ingestor::new(Arc::clone(&embedder), Arc::clone(&index));
    ingestor
        .ingest_jobs(JOBS_CSV.as_bytes(), "jobs.csv", &config.jobs_collection)
        .await
        .expect("jobs fixture should ingest");
    ingestor
        .ingest_resumes(
            RESUMES_CSV.as_bytes(),
            "resumes.csv",
            &config.resumes_collection,
        )
        .await
        .expect("resumes fixture should ingest");

    CareerCoachMatcher::new(embedder, index, config)
}

pub fn empty_matcher() -> TestMatcher {
    CareerCoachMatcher::new(
        stub_embedder(),
        Arc::new(MockVectorIndex::new()),
        MatcherConfig::default(),
    )
}
