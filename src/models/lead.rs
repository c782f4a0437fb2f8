// src/models/lead.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// ---
// 1. Lead (A linha da tabela)
// ---
// Uma linha de uma tabela de localidade. As chaves do JSON são os nomes
// das colunas (snake_case), que é o que o frontend lê (`item.lead_date`).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Lead {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "1")]
    pub sr_no: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-01-15")]
    pub lead_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub visit_date: Option<NaiveDate>,
    pub visit_status: Option<String>,
    #[schema(example = "A. Sharma")]
    pub name: Option<String>,
    #[schema(example = "9999999999")]
    pub contact1: Option<String>,
    pub contact2: Option<String>,
    pub email: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub dob: Option<NaiveDate>,
    pub total_family_members: Option<i32>,
    pub categories: Option<String>,
    #[schema(example = "VIRAR")]
    pub locations: Option<String>,
    pub property_type: Option<String>,
    #[schema(example = "2 BHK")]
    pub bhk: Option<String>,
    #[schema(value_type = Option<f64>, example = 4500000.0)]
    pub budget: Option<Decimal>,
    pub loan_req: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub loan_amount: Option<Decimal>,
    pub caller_name: Option<String>,
    pub meeting_attended_by: Option<String>,
    pub visit_sm_name: Option<String>,
    pub interested_project: Option<String>,
    pub reference: Option<String>,
    pub pickup_drop: Option<String>,
    pub booking_confirmation: Option<String>,
    pub cate: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub followup_date: Option<NaiveDate>,
    pub p1sm: Option<String>,
    pub p2sm: Option<String>,
    pub p3sm: Option<String>,
    pub p4sm: Option<String>,
    pub p5sm: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub remark_date: Option<NaiveDate>,
    pub remark: Option<String>,
    pub banking_remark: Option<String>,
    pub gh_dt_cc: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

// ---
// 2. FieldKind (O tipo SQL de cada coluna)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Integer,
    Decimal,
    Date,
}

/// Largura das colunas `VARCHAR`, em caracteres.
pub const TEXT_MAX_CHARS: usize = 255;

impl FieldKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Text => "VARCHAR(255)",
            FieldKind::LongText => "TEXT",
            FieldKind::Integer => "INTEGER",
            FieldKind::Decimal => "NUMERIC",
            FieldKind::Date => "DATE",
        }
    }

    /// Limite de caracteres aceito pela coluna, quando existe.
    pub fn max_chars(self) -> Option<usize> {
        match self {
            FieldKind::Text => Some(TEXT_MAX_CHARS),
            _ => None,
        }
    }

    /// Campos numéricos e de data: string vazia vira NULL.
    pub fn is_nullable_on_empty(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Decimal | FieldKind::Date)
    }
}

// ---
// 3. LeadField (O conjunto fechado de colunas)
// ---
// Nenhum nome vindo do cliente vira identificador SQL: só os nomes daqui.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    SrNo,
    LeadDate,
    VisitDate,
    VisitStatus,
    Name,
    Contact1,
    Contact2,
    Email,
    Dob,
    TotalFamilyMembers,
    Categories,
    Locations,
    PropertyType,
    Bhk,
    Budget,
    LoanReq,
    LoanAmount,
    CallerName,
    MeetingAttendedBy,
    VisitSmName,
    InterestedProject,
    Reference,
    PickupDrop,
    BookingConfirmation,
    Cate,
    FollowupDate,
    P1Sm,
    P2Sm,
    P3Sm,
    P4Sm,
    P5Sm,
    RemarkDate,
    Remark,
    BankingRemark,
    GhDtCc,
}

impl LeadField {
    /// Ordem das colunas na tabela (igual ao CREATE TABLE).
    pub const ALL: [LeadField; 35] = [
        LeadField::SrNo,
        LeadField::LeadDate,
        LeadField::VisitDate,
        LeadField::VisitStatus,
        LeadField::Name,
        LeadField::Contact1,
        LeadField::Contact2,
        LeadField::Email,
        LeadField::Dob,
        LeadField::TotalFamilyMembers,
        LeadField::Categories,
        LeadField::Locations,
        LeadField::PropertyType,
        LeadField::Bhk,
        LeadField::Budget,
        LeadField::LoanReq,
        LeadField::LoanAmount,
        LeadField::CallerName,
        LeadField::MeetingAttendedBy,
        LeadField::VisitSmName,
        LeadField::InterestedProject,
        LeadField::Reference,
        LeadField::PickupDrop,
        LeadField::BookingConfirmation,
        LeadField::Cate,
        LeadField::FollowupDate,
        LeadField::P1Sm,
        LeadField::P2Sm,
        LeadField::P3Sm,
        LeadField::P4Sm,
        LeadField::P5Sm,
        LeadField::RemarkDate,
        LeadField::Remark,
        LeadField::BankingRemark,
        LeadField::GhDtCc,
    ];

    pub fn column(self) -> &'static str {
        match self {
            LeadField::SrNo => "sr_no",
            LeadField::LeadDate => "lead_date",
            LeadField::VisitDate => "visit_date",
            LeadField::VisitStatus => "visit_status",
            LeadField::Name => "name",
            LeadField::Contact1 => "contact1",
            LeadField::Contact2 => "contact2",
            LeadField::Email => "email",
            LeadField::Dob => "dob",
            LeadField::TotalFamilyMembers => "total_family_members",
            LeadField::Categories => "categories",
            LeadField::Locations => "locations",
            LeadField::PropertyType => "property_type",
            LeadField::Bhk => "bhk",
            LeadField::Budget => "budget",
            LeadField::LoanReq => "loan_req",
            LeadField::LoanAmount => "loan_amount",
            LeadField::CallerName => "caller_name",
            LeadField::MeetingAttendedBy => "meeting_attended_by",
            LeadField::VisitSmName => "visit_sm_name",
            LeadField::InterestedProject => "interested_project",
            LeadField::Reference => "reference",
            LeadField::PickupDrop => "pickup_drop",
            LeadField::BookingConfirmation => "booking_confirmation",
            LeadField::Cate => "cate",
            LeadField::FollowupDate => "followup_date",
            LeadField::P1Sm => "p1sm",
            LeadField::P2Sm => "p2sm",
            LeadField::P3Sm => "p3sm",
            LeadField::P4Sm => "p4sm",
            LeadField::P5Sm => "p5sm",
            LeadField::RemarkDate => "remark_date",
            LeadField::Remark => "remark",
            LeadField::BankingRemark => "banking_remark",
            LeadField::GhDtCc => "gh_dt_cc",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            LeadField::LeadDate
            | LeadField::VisitDate
            | LeadField::Dob
            | LeadField::FollowupDate
            | LeadField::RemarkDate => FieldKind::Date,
            LeadField::TotalFamilyMembers => FieldKind::Integer,
            LeadField::Budget | LeadField::LoanAmount => FieldKind::Decimal,
            LeadField::Remark | LeadField::BankingRemark => FieldKind::LongText,
            _ => FieldKind::Text,
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.column() == column)
    }
}

/// Colunas atribuídas pelo servidor; o cliente não pode enviá-las.
pub const READ_ONLY_COLUMNS: [&str; 2] = ["id", "created_at"];

/// `leadDate` -> `lead_date`. Underscore antes de cada maiúscula, depois minúsculas.
pub fn to_column_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}

/// Lista de colunas usada em todo SELECT/RETURNING (nunca `*`).
pub fn select_list() -> String {
    let mut cols = vec!["id"];
    cols.extend(LeadField::ALL.iter().map(|f| f.column()));
    cols.push("created_at");
    cols.join(", ")
}

/// Definição das colunas do CREATE TABLE, sem o nome da tabela.
pub fn column_definitions() -> String {
    let mut defs = vec!["id SERIAL PRIMARY KEY".to_string()];
    defs.extend(
        LeadField::ALL
            .iter()
            .map(|f| format!("{} {}", f.column(), f.kind().sql_type())),
    );
    defs.push("created_at TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP".to_string());
    defs.join(",\n    ")
}

// ---
// 4. LeadValue (O valor já tipado, pronto para o bind)
// ---
#[derive(Debug, Clone, PartialEq)]
pub enum LeadValue {
    Text(Option<String>),
    Integer(Option<i32>),
    Decimal(Option<Decimal>),
    Date(Option<NaiveDate>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_key(key: &str) -> Option<LeadField> {
        LeadField::from_column(&to_column_name(key))
    }

    #[test]
    fn camel_case_keys_map_to_snake_case_columns() {
        assert_eq!(to_column_name("leadDate"), "lead_date");
        assert_eq!(to_column_name("totalFamilyMembers"), "total_family_members");
        assert_eq!(to_column_name("ghDtCc"), "gh_dt_cc");
        assert_eq!(to_column_name("sr_no"), "sr_no");
        assert_eq!(to_column_name("contact1"), "contact1");
    }

    #[test]
    fn form_keys_resolve_to_known_fields() {
        assert_eq!(from_key("leadDate"), Some(LeadField::LeadDate));
        assert_eq!(from_key("sr_no"), Some(LeadField::SrNo));
        assert_eq!(from_key("srNo"), Some(LeadField::SrNo));
        assert_eq!(from_key("p3sm"), Some(LeadField::P3Sm));
        assert_eq!(from_key("bankingRemark"), Some(LeadField::BankingRemark));
        assert_eq!(from_key("locations"), Some(LeadField::Locations));
    }

    #[test]
    fn unknown_or_hostile_keys_do_not_resolve() {
        assert_eq!(from_key("password"), None);
        assert_eq!(from_key("name; DROP TABLE virar"), None);
        assert_eq!(from_key("id"), None);
        assert_eq!(from_key("createdAt"), None);
    }

    #[test]
    fn every_column_is_unique_and_round_trips() {
        let mut seen = std::collections::HashSet::new();
        for field in LeadField::ALL {
            assert!(seen.insert(field.column()), "coluna duplicada: {}", field.column());
            assert_eq!(LeadField::from_column(field.column()), Some(field));
        }
        assert_eq!(seen.len(), 35);
    }

    #[test]
    fn kinds_match_the_table_layout() {
        assert_eq!(LeadField::Dob.kind(), FieldKind::Date);
        assert_eq!(LeadField::TotalFamilyMembers.kind(), FieldKind::Integer);
        assert_eq!(LeadField::LoanAmount.kind(), FieldKind::Decimal);
        assert_eq!(LeadField::Remark.kind(), FieldKind::LongText);
        assert_eq!(LeadField::Bhk.kind(), FieldKind::Text);
        assert!(FieldKind::Date.is_nullable_on_empty());
        assert!(!FieldKind::Text.is_nullable_on_empty());
    }

    #[test]
    fn text_limit_matches_the_varchar_width() {
        assert_eq!(FieldKind::Text.sql_type(), format!("VARCHAR({TEXT_MAX_CHARS})"));
        assert_eq!(FieldKind::Text.max_chars(), Some(TEXT_MAX_CHARS));
        assert_eq!(FieldKind::LongText.max_chars(), None);
    }

    #[test]
    fn ddl_and_select_list_share_the_same_columns() {
        let ddl = column_definitions();
        assert!(ddl.starts_with("id SERIAL PRIMARY KEY"));
        assert!(ddl.contains("budget NUMERIC"));
        assert!(ddl.contains("remark TEXT"));
        assert!(ddl.contains("followup_date DATE"));

        let select = select_list();
        assert!(select.starts_with("id, sr_no, lead_date"));
        assert!(select.ends_with("gh_dt_cc, created_at"));
        assert_eq!(select.split(", ").count(), 37);
    }
}
