// src/models/company.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company_type")]
pub enum CompanyType {
    #[sqlx(rename = "SDN_BHD")]
    #[serde(rename = "SDN_BHD")]
    SdnBhd, // Private Limited
    #[sqlx(rename = "BHD")]
    #[serde(rename = "BHD")]
    Bhd, // Public Limited
    #[sqlx(rename = "LLP")]
    #[serde(rename = "LLP")]
    Llp, // Limited Liability Partnership
    #[sqlx(rename = "SOLE_PROP")]
    #[serde(rename = "SOLE_PROP")]
    SoleProp,
    #[sqlx(rename = "PARTNERSHIP")]
    #[serde(rename = "PARTNERSHIP")]
    Partnership,
    #[sqlx(rename = "FOREIGN")]
    #[serde(rename = "FOREIGN")]
    Foreign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CompanyStatus {
    Incorporating,
    Active,
    #[sqlx(rename = "STRUCK_OFF")]
    #[serde(rename = "STRUCK_OFF")]
    StruckOff,
    Dormant,
    Liquidation,
    Inactive,
}

// Estruturas JSON tipadas (listas societárias). Validadas na borda do
// serviço, nunca tratadas como blob.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    pub name: String,
    pub identification_number: String,
    pub nationality: String,
    pub address: String,
    pub appointment_date: NaiveDate,
    pub resignation_date: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shareholder {
    pub name: String,
    pub identification_number: String,
    pub shares_held: i64,
    pub share_percentage: Decimal,
    pub appointment_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySecretaryRecord {
    pub name: String,
    pub registration_number: String,
    pub appointment_date: NaiveDate,
    pub resignation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Auditor {
    pub firm_name: String,
    pub registration_number: String,
    pub appointment_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_type: String,
    pub currency: String,
    pub is_primary: bool,
}

// Empresa administrada, vinda do banco
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,

    pub legal_name: String,
    pub registration_number: Option<String>,
    pub company_number: Option<String>,

    pub entity_type: CompanyType,
    pub status: CompanyStatus,

    pub incorporation_date: Option<NaiveDate>,
    pub business_sector: Option<String>,
    pub business_nature: Option<String>,

    pub authorized_capital: Option<Decimal>,
    pub paid_up_capital: Option<Decimal>,
    pub total_shares: Option<i32>,
    pub par_value: Option<String>,

    // Datas de compliance; a situação é derivada na leitura
    pub financial_year_end: Option<NaiveDate>,
    pub next_annual_return_due: Option<NaiveDate>,
    pub last_annual_return_filed: Option<NaiveDate>,
    pub next_agm_date: Option<NaiveDate>,
    pub last_agm_held: Option<NaiveDate>,
    pub is_agm_held: bool,
    pub is_annual_return_filed: bool,

    pub registered_address: Option<String>,
    pub business_address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,

    #[schema(value_type = Option<Vec<Director>>)]
    pub directors: Option<Json<Vec<Director>>>,
    #[schema(value_type = Option<Vec<Shareholder>>)]
    pub shareholders: Option<Json<Vec<Shareholder>>>,
    #[schema(value_type = Option<Vec<CompanySecretaryRecord>>)]
    pub secretaries: Option<Json<Vec<CompanySecretaryRecord>>>,
    #[schema(value_type = Option<Vec<Auditor>>)]
    pub auditors: Option<Json<Vec<Auditor>>>,
    #[schema(value_type = Option<Vec<BankAccount>>)]
    pub bank_accounts: Option<Json<Vec<BankAccount>>>,

    pub notes: Option<String>,
    pub is_active: bool,

    pub owner_id: Uuid,
    pub assigned_secretary_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Company {
    // Em dia sse nenhuma das duas datas está estritamente no passado.
    // Sem datas, vale por vacuidade.
    pub fn is_compliant(&self, today: NaiveDate) -> bool {
        if matches!(self.next_annual_return_due, Some(due) if due < today) {
            return false;
        }
        if matches!(self.next_agm_date, Some(agm) if agm < today) {
            return false;
        }
        true
    }

    // A mais próxima das duas obrigações, ou None se nenhuma marcada
    pub fn next_compliance_due(&self) -> Option<NaiveDate> {
        match (self.next_annual_return_due, self.next_agm_date) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    pub fn company_age_years(&self, today: NaiveDate) -> i32 {
        match self.incorporation_date {
            Some(date) => lifecycle::full_years_between(date, today),
            None => 0,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "A razão social é obrigatória."))]
    pub legal_name: String,

    pub registration_number: Option<String>,
    pub company_number: Option<String>,
    pub entity_type: Option<CompanyType>,
    pub status: Option<CompanyStatus>,
    pub incorporation_date: Option<NaiveDate>,
    pub business_sector: Option<String>,
    pub business_nature: Option<String>,
    pub authorized_capital: Option<Decimal>,
    pub paid_up_capital: Option<Decimal>,
    pub total_shares: Option<i32>,
    pub par_value: Option<String>,
    pub financial_year_end: Option<NaiveDate>,
    pub next_annual_return_due: Option<NaiveDate>,
    pub next_agm_date: Option<NaiveDate>,
    pub registered_address: Option<String>,
    pub business_address: Option<String>,
    pub phone_number: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub website: Option<String>,
    pub directors: Option<Vec<Director>>,
    pub shareholders: Option<Vec<Shareholder>>,
    pub secretaries: Option<Vec<CompanySecretaryRecord>>,
    pub auditors: Option<Vec<Auditor>>,
    pub bank_accounts: Option<Vec<BankAccount>>,
    pub notes: Option<String>,

    // Só papéis privilegiados podem criar para outro dono
    pub owner_id: Option<Uuid>,
    pub assigned_secretary_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 1, message = "A razão social não pode ficar vazia."))]
    pub legal_name: Option<String>,
    pub company_number: Option<String>,
    pub entity_type: Option<CompanyType>,
    pub status: Option<CompanyStatus>,
    pub incorporation_date: Option<NaiveDate>,
    pub business_sector: Option<String>,
    pub business_nature: Option<String>,
    pub authorized_capital: Option<Decimal>,
    pub paid_up_capital: Option<Decimal>,
    pub total_shares: Option<i32>,
    pub par_value: Option<String>,
    pub financial_year_end: Option<NaiveDate>,
    pub next_annual_return_due: Option<NaiveDate>,
    pub last_annual_return_filed: Option<NaiveDate>,
    pub next_agm_date: Option<NaiveDate>,
    pub last_agm_held: Option<NaiveDate>,
    pub is_agm_held: Option<bool>,
    pub is_annual_return_filed: Option<bool>,
    pub registered_address: Option<String>,
    pub business_address: Option<String>,
    pub phone_number: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub website: Option<String>,
    pub directors: Option<Vec<Director>>,
    pub shareholders: Option<Vec<Shareholder>>,
    pub secretaries: Option<Vec<CompanySecretaryRecord>>,
    pub auditors: Option<Vec<Auditor>>,
    pub bank_accounts: Option<Vec<BankAccount>>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
    pub assigned_secretary_id: Option<Uuid>,
}

// Relatório de compliance derivado na leitura
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub company_id: Uuid,
    pub is_compliant: bool,
    pub next_compliance_due: Option<NaiveDate>,
    pub company_age_years: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Company {
        let now = Utc::now();
        Company {
            id: Uuid::new_v4(),
            legal_name: "Acme Sdn Bhd".into(),
            registration_number: Some("202401000001".into()),
            company_number: None,
            entity_type: CompanyType::SdnBhd,
            status: CompanyStatus::Active,
            incorporation_date: None,
            business_sector: None,
            business_nature: None,
            authorized_capital: None,
            paid_up_capital: None,
            total_shares: None,
            par_value: None,
            financial_year_end: None,
            next_annual_return_due: None,
            last_annual_return_filed: None,
            next_agm_date: None,
            last_agm_held: None,
            is_agm_held: false,
            is_annual_return_filed: false,
            registered_address: None,
            business_address: None,
            phone_number: None,
            email: None,
            website: None,
            directors: None,
            shareholders: None,
            secretaries: None,
            auditors: None,
            bank_accounts: None,
            notes: None,
            is_active: true,
            owner_id: Uuid::new_v4(),
            assigned_secretary_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn overdue_annual_return_breaks_compliance() {
        let today = date(2026, 8, 6);
        let mut company = sample();
        company.next_annual_return_due = Some(date(2026, 8, 5)); // ontem
        assert!(!company.is_compliant(today));

        // Vence hoje: ainda em dia (só o passado estrito quebra)
        company.next_annual_return_due = Some(today);
        assert!(company.is_compliant(today));
    }

    #[test]
    fn overdue_agm_breaks_compliance() {
        let today = date(2026, 8, 6);
        let mut company = sample();
        company.next_agm_date = Some(date(2026, 1, 1));
        assert!(!company.is_compliant(today));
    }

    #[test]
    fn no_dates_means_vacuously_compliant_and_no_due() {
        let company = sample();
        assert!(company.is_compliant(date(2026, 8, 6)));
        assert_eq!(company.next_compliance_due(), None);
    }

    #[test]
    fn next_due_is_the_earlier_of_the_two() {
        let mut company = sample();
        company.next_annual_return_due = Some(date(2026, 9, 1));
        company.next_agm_date = Some(date(2026, 8, 15));
        assert_eq!(company.next_compliance_due(), Some(date(2026, 8, 15)));

        company.next_agm_date = None;
        assert_eq!(company.next_compliance_due(), Some(date(2026, 9, 1)));
    }
}
