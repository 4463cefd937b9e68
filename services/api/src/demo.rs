use crate::infra::{
    parse_decimal, parse_employment_status, parse_loan_type, InMemoryCreditRepository,
};
use clap::Args;
use credit_bureau::config::AppConfig;
use credit_bureau::credit::{
    AccountType, CreateHistoryRequest, CreateScoreRequest, CreditBureauService,
    CreditCheckRequest, EmploymentStatus, LoanApplicationRequest, LoanType, PaymentStatus,
    ScoreProvider, Ssn,
};
use credit_bureau::error::AppError;
use rust_decimal::Decimal;
use std::sync::Arc;

type CliService = CreditBureauService<InMemoryCreditRepository, dyn ScoreProvider>;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Applicant SSN (NNN-NN-NNNN)
    #[arg(long)]
    pub(crate) ssn: String,
    #[arg(long, default_value = "Jane")]
    pub(crate) first_name: String,
    #[arg(long, default_value = "Doe")]
    pub(crate) last_name: String,
    /// Score to place on file. Without it the configured fallback provider supplies one.
    #[arg(long)]
    pub(crate) score: Option<i32>,
    /// Requested loan amount
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) amount: Decimal,
    /// Gross annual income; required for scores between 600 and 699
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) annual_income: Option<Decimal>,
    #[arg(long, value_parser = parse_loan_type, default_value = "personal")]
    pub(crate) loan_type: LoanType,
    #[arg(long, default_value_t = 36)]
    pub(crate) term_months: u32,
    #[arg(long, value_parser = parse_employment_status, default_value = "employed")]
    pub(crate) employment_status: EmploymentStatus,
    /// Balance of a single active, current account reported for the applicant
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) active_balance: Option<Decimal>,
    /// Number of active accounts reported 90 days late with no balance
    #[arg(long, default_value_t = 0)]
    pub(crate) delinquent_accounts: u32,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Requested amount used for every scenario
    #[arg(long, value_parser = parse_decimal, default_value = "10000")]
    pub(crate) requested_amount: Decimal,
    /// Print the full decision payload for each scenario
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = cli_service(config.bureau.fallback_score.provider());
    let ssn = Ssn(args.ssn);

    if let Some(score) = args.score {
        seed_score(&service, &ssn, &args.first_name, &args.last_name, score)?;
    }
    if let Some(balance) = args.active_balance {
        seed_account(&service, &ssn, "Reported balance", balance, PaymentStatus::Current)?;
    }
    for _ in 0..args.delinquent_accounts {
        seed_account(&service, &ssn, "Collections Co", Decimal::ZERO, PaymentStatus::Late90)?;
    }

    let request = CreditCheckRequest {
        ssn,
        first_name: args.first_name,
        last_name: args.last_name,
        requested_amount: args.amount,
        loan_type: args.loan_type,
        term_months: args.term_months,
        annual_income: args.annual_income,
        employment_status: args.employment_status,
    };
    let result = service.perform_credit_check(&request)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

struct Scenario {
    label: &'static str,
    ssn: &'static str,
    score: i32,
    active_balance: Option<i64>,
    delinquent_accounts: usize,
    annual_income: Option<i64>,
}

const SCENARIOS: [Scenario; 5] = [
    Scenario {
        label: "Strong score, ratio ignored",
        ssn: "100-00-0001",
        score: 720,
        active_balance: Some(48_000),
        delinquent_accounts: 0,
        annual_income: Some(60_000),
    },
    Scenario {
        label: "Mid score at the 40% ratio boundary",
        ssn: "100-00-0002",
        score: 620,
        active_balance: Some(2_000),
        delinquent_accounts: 0,
        annual_income: Some(60_000),
    },
    Scenario {
        label: "Mid score just over the ratio limit",
        ssn: "100-00-0003",
        score: 620,
        active_balance: Some(2_050),
        delinquent_accounts: 0,
        annual_income: Some(60_000),
    },
    Scenario {
        label: "Very low score with delinquencies",
        ssn: "100-00-0004",
        score: 450,
        active_balance: None,
        delinquent_accounts: 3,
        annual_income: Some(45_000),
    },
    Scenario {
        label: "Subprime score with delinquencies",
        ssn: "100-00-0005",
        score: 580,
        active_balance: None,
        delinquent_accounts: 3,
        annual_income: Some(45_000),
    },
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        requested_amount,
        json,
    } = args;

    let service = cli_service(Arc::new(credit_bureau::credit::FixedScoreProvider(700)));

    println!("Credit decision walkthrough (requested amount {requested_amount})");
    for scenario in &SCENARIOS {
        let ssn = Ssn(scenario.ssn.to_string());
        seed_score(&service, &ssn, "Demo", "Applicant", scenario.score)?;
        if let Some(balance) = scenario.active_balance {
            seed_account(
                &service,
                &ssn,
                "Lakeside Credit Union",
                Decimal::from(balance),
                PaymentStatus::Current,
            )?;
        }
        for _ in 0..scenario.delinquent_accounts {
            seed_account(&service, &ssn, "Collections Co", Decimal::ZERO, PaymentStatus::Late90)?;
        }

        let submitted = service.submit_application(LoanApplicationRequest {
            applicant: CreditCheckRequest {
                ssn: ssn.clone(),
                first_name: "Demo".to_string(),
                last_name: "Applicant".to_string(),
                requested_amount,
                loan_type: LoanType::Personal,
                term_months: 36,
                annual_income: scenario.annual_income.map(Decimal::from),
                employment_status: EmploymentStatus::Employed,
            },
            email: None,
            phone: None,
        })?;

        let result = &submitted.credit_check;
        println!("\n{} ({})", scenario.label, ssn.masked());
        println!(
            "- score {} [{}] | {} active accounts",
            result.credit_score,
            result.risk_level.label(),
            result.credit_history.len()
        );
        println!(
            "- decision {} | amount {} | rate {}%",
            result.decision.label(),
            result.approved_amount,
            result.recommended_interest_rate
        );
        if let Some(reason) = &result.rejection_reason {
            println!("- reason: {reason}");
        }
        println!(
            "- application {} -> {}",
            submitted.application.application_id,
            submitted.application.status.label()
        );
        if json {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    }

    Ok(())
}

fn cli_service(provider: Arc<dyn ScoreProvider>) -> CliService {
    CreditBureauService::new(Arc::new(InMemoryCreditRepository::default()), provider)
}

fn seed_score(
    service: &CliService,
    ssn: &Ssn,
    first_name: &str,
    last_name: &str,
    score: i32,
) -> Result<(), AppError> {
    service.create_score(CreateScoreRequest {
        ssn: ssn.clone(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        score,
        risk_level: None,
    })?;
    Ok(())
}

fn seed_account(
    service: &CliService,
    ssn: &Ssn,
    creditor_name: &str,
    balance: Decimal,
    payment_status: PaymentStatus,
) -> Result<(), AppError> {
    let days_late = (payment_status == PaymentStatus::Late90).then_some(90);
    service.create_history(CreateHistoryRequest {
        ssn: ssn.clone(),
        account_type: AccountType::Loan,
        creditor_name: creditor_name.to_string(),
        original_amount: balance,
        current_balance: Some(balance),
        credit_limit: None,
        payment_status,
        days_late,
        account_opened_at: None,
        last_payment_at: None,
        is_active: None,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_bureau::credit::{CreditDecision, FixedScoreProvider};

    #[test]
    fn demo_runs_every_scenario() {
        let args = DemoArgs {
            requested_amount: Decimal::from(10000),
            json: false,
        };
        run_demo(args).expect("demo completes");
    }

    #[test]
    fn seeded_accounts_drive_the_ratio() {
        let service = cli_service(Arc::new(FixedScoreProvider(700)));
        let ssn = Ssn("100-00-0003".to_string());
        seed_score(&service, &ssn, "Demo", "Applicant", 620).expect("score");
        seed_account(
            &service,
            &ssn,
            "Lakeside Credit Union",
            Decimal::from(2_050),
            PaymentStatus::Current,
        )
        .expect("account");

        let result = service
            .perform_credit_check(&CreditCheckRequest {
                ssn,
                first_name: "Demo".to_string(),
                last_name: "Applicant".to_string(),
                requested_amount: Decimal::from(10000),
                loan_type: LoanType::Personal,
                term_months: 36,
                annual_income: Some(Decimal::from(60_000)),
                employment_status: EmploymentStatus::Employed,
            })
            .expect("check");

        assert_eq!(result.decision, CreditDecision::ManualReview);
    }
}
