//! Record type schemas
//!
//! Each import target (closed client files, donor tracker, grant
//! applications, networking contacts, disbursed awards) is described by a
//! static table of [`FieldSpec`]s: canonical column name, accepted header
//! aliases, requiredness, and target type. The import pipeline is generic
//! over these tables; there is one pipeline, not one per record type.

use std::fmt;
use std::str::FromStr;

/// Target type of an importable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text; blank becomes absent, never an empty string.
    Text,
    /// Non-negative integer (e.g. age).
    Integer,
    /// Calendar date, normalized to YYYY-MM-DD.
    Date,
    /// Dollar amount; `$` and `,` are stripped before parsing.
    Currency,
}

/// Declarative description of one importable field.
pub struct FieldSpec {
    /// Canonical name; doubles as the store column name.
    pub name: &'static str,
    /// Accepted header spellings, primary alias first. Matching is
    /// case-insensitive and trims surrounding whitespace.
    pub aliases: &'static [&'static str],
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// The spelling used in user-facing error messages.
    pub fn label(&self) -> &'static str {
        self.aliases[0]
    }
}

/// Reporting-year partition for record types bucketed by year.
pub struct PartitionSpec {
    /// Canonical field the resolved year is stored under.
    pub field: &'static str,
    pub aliases: &'static [&'static str],
    pub min: i32,
    pub max: i32,
}

/// Full import schema for one record type.
pub struct RecordSchema {
    /// Store table the batch is inserted into.
    pub table: &'static str,
    /// Human-readable name for logs and CLI output.
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub partition: Option<PartitionSpec>,
    /// Whether the table carries a creator (`user_id`) column.
    pub stamps_user: bool,
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The record types the pipeline knows how to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    ClientFiles,
    DonorTracker,
    GrantApplications,
    NetworkingContacts,
    DisbursedAwards,
}

impl RecordType {
    pub fn schema(self) -> &'static RecordSchema {
        match self {
            RecordType::ClientFiles => &CLIENT_FILES,
            RecordType::DonorTracker => &DONOR_TRACKER,
            RecordType::GrantApplications => &GRANT_APPLICATIONS,
            RecordType::NetworkingContacts => &NETWORKING_CONTACTS,
            RecordType::DisbursedAwards => &DISBURSED_AWARDS,
        }
    }

    pub fn all() -> &'static [RecordType] {
        &[
            RecordType::ClientFiles,
            RecordType::DonorTracker,
            RecordType::GrantApplications,
            RecordType::NetworkingContacts,
            RecordType::DisbursedAwards,
        ]
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client-files" | "client_files" | "clients" => Ok(RecordType::ClientFiles),
            "donor-tracker" | "donor_tracker" | "donors" => Ok(RecordType::DonorTracker),
            "grants" | "grant-applications" => Ok(RecordType::GrantApplications),
            "contacts" | "networking-contacts" => Ok(RecordType::NetworkingContacts),
            "awards" | "disbursed-awards" => Ok(RecordType::DisbursedAwards),
            other => Err(format!("unknown record type: {other}")),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema().label)
    }
}

/// Closed client case files, bucketed by reporting year.
pub static CLIENT_FILES: RecordSchema = RecordSchema {
    table: "closed_client_files",
    label: "client files",
    fields: &[
        FieldSpec {
            name: "client_name",
            aliases: &["Client Name"],
            required: true,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "life_coach",
            aliases: &["Life Coach"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "start_date",
            aliases: &["Start Date"],
            required: false,
            kind: FieldKind::Date,
        },
        FieldSpec {
            name: "end_date",
            aliases: &["End Date"],
            required: false,
            kind: FieldKind::Date,
        },
        FieldSpec {
            name: "area_office",
            aliases: &["Area Office"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "race_eth",
            aliases: &["Race/Eth"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "sex",
            aliases: &["Sex"],
            required: false,
            kind: FieldKind::Text,
        },
        // Source exports sometimes label this column "Case " with a
        // trailing space; trimming covers it, the alias is kept for clarity.
        FieldSpec {
            name: "case_code",
            aliases: &["Case", "Case "],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "age",
            aliases: &["Age"],
            required: false,
            kind: FieldKind::Integer,
        },
        FieldSpec {
            name: "hometown",
            aliases: &["HOMETOWN", "Hometown"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "model",
            aliases: &["Model"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "notes",
            aliases: &["Notes"],
            required: false,
            kind: FieldKind::Text,
        },
    ],
    partition: Some(PartitionSpec {
        field: "year",
        aliases: &["Year"],
        min: 2000,
        max: 2100,
    }),
    stamps_user: false,
};

const DONOR_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "donor_name",
        aliases: &["donor_name"],
        required: true,
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "date_opened",
        aliases: &["date_opened"],
        required: false,
        kind: FieldKind::Date,
    },
    FieldSpec {
        name: "date_due",
        aliases: &["date_due"],
        required: false,
        kind: FieldKind::Date,
    },
    FieldSpec {
        name: "program",
        aliases: &["program"],
        required: false,
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "value",
        aliases: &["value"],
        required: false,
        kind: FieldKind::Currency,
    },
    FieldSpec {
        name: "region",
        aliases: &["region"],
        required: false,
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "contact",
        aliases: &["contact"],
        required: false,
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "review_url",
        aliases: &["review_url"],
        required: false,
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "notes",
        aliases: &["notes"],
        required: false,
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "date_submission",
        aliases: &["date_submission"],
        required: false,
        kind: FieldKind::Date,
    },
    FieldSpec {
        name: "report_due",
        aliases: &["report_due"],
        required: false,
        kind: FieldKind::Date,
    },
    FieldSpec {
        name: "status",
        aliases: &["status"],
        required: false,
        kind: FieldKind::Text,
    },
];

/// Donor tracker entries; snake_case headers are the documented schema.
pub static DONOR_TRACKER: RecordSchema = RecordSchema {
    table: "donor_tracker",
    label: "donor tracker",
    fields: DONOR_FIELDS,
    partition: None,
    stamps_user: true,
};

/// Grant applications share the donor tracker field set, different table.
pub static GRANT_APPLICATIONS: RecordSchema = RecordSchema {
    table: "grants",
    label: "grant applications",
    fields: DONOR_FIELDS,
    partition: None,
    stamps_user: true,
};

pub static NETWORKING_CONTACTS: RecordSchema = RecordSchema {
    table: "networking_contacts",
    label: "networking contacts",
    fields: &[
        FieldSpec {
            name: "name",
            aliases: &["name"],
            required: true,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "organization",
            aliases: &["organization"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "title",
            aliases: &["title"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "email",
            aliases: &["email"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "phone",
            aliases: &["phone"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "donor",
            aliases: &["donor"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "award_ceremony",
            aliases: &["award_ceremony", "award ceremony"],
            required: false,
            kind: FieldKind::Text,
        },
    ],
    partition: None,
    stamps_user: true,
};

pub static DISBURSED_AWARDS: RecordSchema = RecordSchema {
    table: "disbursed_awards",
    label: "disbursed awards",
    fields: &[
        FieldSpec {
            name: "donor_name",
            aliases: &["Donor Name"],
            required: true,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "award_name",
            aliases: &["Award Name"],
            required: false,
            kind: FieldKind::Text,
        },
        FieldSpec {
            name: "amount",
            aliases: &["Amount"],
            required: false,
            kind: FieldKind::Currency,
        },
        FieldSpec {
            name: "date_disbursed",
            aliases: &["Date Disbursed"],
            required: false,
            kind: FieldKind::Date,
        },
        FieldSpec {
            name: "notes",
            aliases: &["Notes"],
            required: false,
            kind: FieldKind::Text,
        },
    ],
    partition: None,
    stamps_user: true,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_schema_has_one_required_identity_field() {
        for rt in RecordType::all() {
            let schema = rt.schema();
            let required: Vec<_> = schema.fields.iter().filter(|f| f.required).collect();
            assert_eq!(required.len(), 1, "{} should have one required field", rt);
        }
    }

    #[test]
    fn test_record_type_parsing() {
        assert_eq!(
            "client-files".parse::<RecordType>().unwrap(),
            RecordType::ClientFiles
        );
        assert_eq!(
            "GRANTS".parse::<RecordType>().unwrap(),
            RecordType::GrantApplications
        );
        assert!("unknown".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_only_client_files_is_year_partitioned() {
        for rt in RecordType::all() {
            let partitioned = rt.schema().partition.is_some();
            assert_eq!(partitioned, *rt == RecordType::ClientFiles);
        }
    }

    #[test]
    fn test_grants_share_donor_fields_but_not_table() {
        assert_eq!(DONOR_TRACKER.fields.len(), GRANT_APPLICATIONS.fields.len());
        assert_ne!(DONOR_TRACKER.table, GRANT_APPLICATIONS.table);
    }
}
