use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::calendar::ImperialDate;
use crate::errors::{parse_int, split_fields, Errcode};
use crate::syslog::{Observer, Priority};

pub const BERTH_DAILY_FEE: i64 = 100;
pub const BERTH_INITIAL_DAYS: u32 = 6;
const BERTH_MAX_DRIFT: i64 = 6;
pub const BILLING_PERIOD_DAYS: i64 = 28;
const MAINTENANCE_YELLOW_DAYS: i64 = 310;
const MAINTENANCE_RED_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: ImperialDate,
    pub debit: i64,
    pub credit: i64,
    pub balance: i64,
    pub location: String,
    pub memo: String,
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:<16} -{:>10} +{:>10} ={:>12}  {}",
            self.date, self.location, self.debit, self.credit, self.balance, self.memo
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, IntoStaticStr)]
pub enum MaintenanceStatus {
    Green,
    Yellow,
    Red,
}

impl MaintenanceStatus {
    pub fn from_days(days_since: i64) -> MaintenanceStatus {
        if days_since < MAINTENANCE_YELLOW_DAYS {
            MaintenanceStatus::Green
        } else if days_since <= MAINTENANCE_RED_DAYS {
            MaintenanceStatus::Yellow
        } else {
            MaintenanceStatus::Red
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Financials {
    balance: i64,
    ledger: Vec<Transaction>,
    berth_expiry: Option<ImperialDate>,
    berth_recurrence: Option<u32>,
    salary_paid: ImperialDate,
    loan_paid: ImperialDate,
    last_maintenance: ImperialDate,
    maintenance_status: MaintenanceStatus,

    monthly_salary: i64,
    loan_payment: i64,
}

impl Financials {
    /// Fresh accounts where every obligation was settled on `date`
    pub fn new(balance: i64, date: ImperialDate) -> Financials {
        Financials {
            balance,
            ledger: vec![],
            berth_expiry: None,
            berth_recurrence: None,
            salary_paid: date,
            loan_paid: date,
            last_maintenance: date,
            maintenance_status: MaintenanceStatus::Green,
            monthly_salary: 0,
            loan_payment: 0,
        }
    }

    pub fn with_obligations(mut self, monthly_salary: i64, loan_payment: i64) -> Financials {
        self.monthly_salary = monthly_salary;
        self.loan_payment = loan_payment;
        self
    }

    pub fn with_berth(mut self, expiry: ImperialDate, recurrence: u32) -> Financials {
        self.berth_expiry = Some(expiry);
        self.berth_recurrence = Some(recurrence);
        self
    }

    pub fn set_monthly_salary(&mut self, monthly_salary: i64) {
        self.monthly_salary = monthly_salary;
    }

    #[inline]
    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn ledger(&self) -> &[Transaction] {
        &self.ledger
    }

    pub fn berth_expiry(&self) -> Option<ImperialDate> {
        self.berth_expiry
    }

    pub fn salary_paid(&self) -> ImperialDate {
        self.salary_paid
    }

    pub fn loan_paid(&self) -> ImperialDate {
        self.loan_paid
    }

    pub fn last_maintenance(&self) -> ImperialDate {
        self.last_maintenance
    }

    pub fn maintenance_status(&self) -> MaintenanceStatus {
        self.maintenance_status
    }

    #[inline]
    pub fn can_afford(&self, amount: i64) -> bool {
        amount <= self.balance
    }

    pub fn debit(&mut self, date: ImperialDate, location: &str, amount: i64, memo: &str) {
        self.balance -= amount;
        self.post(date, location, amount, 0, memo);
    }

    pub fn credit(&mut self, date: ImperialDate, location: &str, amount: i64, memo: &str) {
        self.balance += amount;
        self.post(date, location, 0, amount, memo);
    }

    fn post(&mut self, date: ImperialDate, location: &str, debit: i64, credit: i64, memo: &str) {
        log::debug!("Ledger {date} {location}: -{debit} +{credit} -> {} ({memo})", self.balance);
        self.ledger.push(Transaction {
            date,
            debit,
            credit,
            balance: self.balance,
            location: location.to_string(),
            memo: memo.to_string(),
        });
    }

    /// Pays for the first six days of berth when landing
    pub fn dock(&mut self, date: ImperialDate, location: &str, obs: &mut dyn Observer) {
        let memo = format!("Berthing fee on {} ({BERTH_DAILY_FEE} Cr).", date.day());
        self.debit(date, location, BERTH_DAILY_FEE, &memo);
        obs.message(&memo, Priority::Info);
        self.berth_expiry = Some(date.plus_days(BERTH_INITIAL_DAYS as i64));
        self.berth_recurrence = Some(1);
    }

    pub fn undock(&mut self) {
        self.berth_expiry = None;
        self.berth_recurrence = None;
    }

    /// Evaluates every recurring obligation against `date`
    pub fn on_new_date(
        &mut self,
        date: ImperialDate,
        location: &str,
        docked: bool,
        obs: &mut dyn Observer,
    ) {
        let before = self.balance;
        if docked {
            self.renew_berth(date, location, obs);
        }
        self.pay_salaries(date, location, obs);
        self.pay_loan(date, location, obs);
        self.check_maintenance(date, obs);

        if self.balance < 0 && before >= 0 {
            obs.message(
                &format!("Your bank account is overdrawn ({} Cr).", self.balance),
                Priority::Alert,
            );
        }
    }

    fn renew_berth(&mut self, date: ImperialDate, location: &str, obs: &mut dyn Observer) {
        let (Some(expiry), Some(recurrence)) = (self.berth_expiry, self.berth_recurrence) else {
            return;
        };
        if date <= expiry {
            return;
        }
        let cost = BERTH_DAILY_FEE * (recurrence as i64);
        let unit = if recurrence == 1 { "day" } else { "days" };
        let memo = format!(
            "Renewing berth on {} for {recurrence} {unit} ({cost} Cr).",
            date.day()
        );
        self.debit(date, location, cost, &memo);
        obs.message(&memo, Priority::Info);
        self.berth_expiry = Some(date.plus_days(recurrence as i64));
    }

    fn pay_salaries(&mut self, date: ImperialDate, location: &str, obs: &mut dyn Observer) {
        while date.days_since(&self.salary_paid) >= BILLING_PERIOD_DAYS {
            self.salary_paid = self.salary_paid.plus_days(BILLING_PERIOD_DAYS);
            if self.monthly_salary == 0 {
                continue;
            }
            let memo = format!(
                "Paying crew salaries on {} ({} Cr).",
                self.salary_paid.day(),
                self.monthly_salary
            );
            self.debit(self.salary_paid, location, self.monthly_salary, &memo);
            obs.message(&memo, Priority::Info);
        }
    }

    fn pay_loan(&mut self, date: ImperialDate, location: &str, obs: &mut dyn Observer) {
        while date.days_since(&self.loan_paid) >= BILLING_PERIOD_DAYS {
            self.loan_paid = self.loan_paid.plus_days(BILLING_PERIOD_DAYS);
            if self.loan_payment == 0 {
                continue;
            }
            let memo = format!(
                "Paying ship loan on {} ({} Cr).",
                self.loan_paid.day(),
                self.loan_payment
            );
            self.debit(self.loan_paid, location, self.loan_payment, &memo);
            obs.message(&memo, Priority::Info);
        }
    }

    fn check_maintenance(&mut self, date: ImperialDate, obs: &mut dyn Observer) {
        let days = date.days_since(&self.last_maintenance);
        let status = MaintenanceStatus::from_days(days);
        if status > self.maintenance_status {
            match status {
                MaintenanceStatus::Yellow => obs.message(
                    &format!("Annual maintenance is due soon ({days} days since last)."),
                    Priority::Warn,
                ),
                MaintenanceStatus::Red => obs.message(
                    &format!("Annual maintenance is overdue ({days} days since last)."),
                    Priority::Alert,
                ),
                MaintenanceStatus::Green => {}
            }
        }
        self.maintenance_status = status;
    }

    pub fn perform_maintenance(&mut self, date: ImperialDate, location: &str, cost: i64) {
        let memo = format!("Annual maintenance on {} ({cost} Cr).", date.day());
        self.debit(date, location, cost, &memo);
        self.last_maintenance = date;
        self.maintenance_status = MaintenanceStatus::Green;
    }

    pub fn encode(&self) -> String {
        let opt = |v: Option<String>| v.unwrap_or_else(|| "None".to_string());
        format!(
            "{} - {} - {} - {} - {} - {}",
            self.balance,
            opt(self.berth_expiry.map(|d| d.to_string())),
            opt(self.berth_recurrence.map(|r| r.to_string())),
            self.salary_paid,
            self.loan_paid,
            self.last_maintenance
        )
    }

    /// `date` is the current game date, used to validate the berth expiry
    pub fn decode(s: &str, date: ImperialDate) -> Result<Financials, Errcode> {
        let fields = split_fields("Financials", s, 6)?;
        let balance = parse_int::<i64>("balance", fields[0])?;
        let berth_expiry = match fields[1] {
            "None" => None,
            d => Some(d.parse::<ImperialDate>()?),
        };
        let berth_recurrence = match fields[2] {
            "None" => None,
            r => Some(parse_int::<u32>("berth recurrence", r)?),
        };
        if berth_expiry.is_some() != berth_recurrence.is_some() || berth_recurrence == Some(0) {
            return Err(Errcode::ValueOutOfRange(
                "berth recurrence",
                fields[2].to_string(),
            ));
        }
        if let Some(expiry) = berth_expiry {
            if expiry.days_since(&date).abs() > BERTH_MAX_DRIFT {
                return Err(Errcode::BerthExpiryOutOfRange(expiry, date));
            }
        }
        let salary_paid = fields[3].parse::<ImperialDate>()?;
        let loan_paid = fields[4].parse::<ImperialDate>()?;
        let last_maintenance = fields[5].parse::<ImperialDate>()?;

        Ok(Financials {
            balance,
            ledger: vec![],
            berth_expiry,
            berth_recurrence,
            salary_paid,
            loan_paid,
            last_maintenance,
            maintenance_status: MaintenanceStatus::from_days(date.days_since(&last_maintenance)),
            monthly_salary: 0,
            loan_payment: 0,
        })
    }
}
