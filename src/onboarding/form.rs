//! Form catalogue: step labels, field descriptors, progress, and the
//! review rows shown on the summary step.

use super::model::{ProfilePatch, RegistrationData, StorePatch, VerificationPatch};
use super::state::Step;

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Phone,
    Number,
}

/// Every editable text field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    FullName,
    Phone,
    Email,
    Address,
    Province,
    Regency,
    StoreName,
    StoreAddress,
    AnnualSales,
    KtpNumber,
}

/// Static description of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub step: Step,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    /// Input is cut to this many characters as it is typed.
    pub max_len: Option<usize>,
}

const fn field(
    id: FieldId,
    step: Step,
    label: &'static str,
    placeholder: &'static str,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        id,
        step,
        label,
        placeholder,
        kind,
        max_len: None,
    }
}

/// Maximum length of the NIK input.
pub const KTP_NUMBER_LEN: usize = 16;

/// All fields in display order.
pub static FIELDS: [FieldSpec; 10] = [
    field(
        FieldId::FullName,
        Step::Profile,
        "Nama Lengkap Sesuai KTP",
        "Contoh: Budi Santoso",
        FieldKind::Text,
    ),
    field(
        FieldId::Phone,
        Step::Profile,
        "Nomor WhatsApp",
        "62812xxx",
        FieldKind::Phone,
    ),
    field(
        FieldId::Email,
        Step::Profile,
        "Alamat Email",
        "nama@email.com",
        FieldKind::Text,
    ),
    field(
        FieldId::Address,
        Step::Profile,
        "Alamat Domisili",
        "Nama Jalan, No. Rumah, Desa/Kelurahan",
        FieldKind::Multiline,
    ),
    field(
        FieldId::Province,
        Step::Profile,
        "Provinsi",
        "Sumatera Selatan",
        FieldKind::Text,
    ),
    field(
        FieldId::Regency,
        Step::Profile,
        "Kabupaten/Kota",
        "Lahat",
        FieldKind::Text,
    ),
    field(
        FieldId::StoreName,
        Step::Store,
        "Nama Toko",
        "Contoh: Kopi Jaya Makmur",
        FieldKind::Text,
    ),
    field(
        FieldId::StoreAddress,
        Step::Store,
        "Alamat Lengkap Toko",
        "Alamat operasional toko...",
        FieldKind::Multiline,
    ),
    field(
        FieldId::AnnualSales,
        Step::Store,
        "Estimasi Penjualan Per Tahun (Kg)",
        "Misal: 1000",
        FieldKind::Number,
    ),
    FieldSpec {
        max_len: Some(KTP_NUMBER_LEN),
        ..field(
            FieldId::KtpNumber,
            Step::Verification,
            "Nomor NIK KTP (16 Digit)",
            "16 digit nomor induk kependudukan",
            FieldKind::Text,
        )
    },
];

/// Fields belonging to a step, in display order.
pub fn fields_for(step: Step) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |f| f.step == step)
}

/// A single-field update routed to the right sub-record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch {
    Profile(ProfilePatch),
    Store(StorePatch),
    Verification(VerificationPatch),
}

impl FieldId {
    /// Position of this field in [`FIELDS`].
    pub fn index(&self) -> usize {
        match self {
            Self::FullName => 0,
            Self::Phone => 1,
            Self::Email => 2,
            Self::Address => 3,
            Self::Province => 4,
            Self::Regency => 5,
            Self::StoreName => 6,
            Self::StoreAddress => 7,
            Self::AnnualSales => 8,
            Self::KtpNumber => 9,
        }
    }

    pub fn spec(&self) -> &'static FieldSpec {
        &FIELDS[self.index()]
    }

    /// Current value of this field in the record.
    pub fn value<'a>(&self, data: &'a RegistrationData) -> &'a str {
        match self {
            Self::FullName => &data.profile.full_name,
            Self::Phone => &data.profile.phone,
            Self::Email => &data.profile.email,
            Self::Address => &data.profile.address,
            Self::Province => &data.profile.province,
            Self::Regency => &data.profile.regency,
            Self::StoreName => &data.store.store_name,
            Self::StoreAddress => &data.store.store_address,
            Self::AnnualSales => &data.store.annual_sales,
            Self::KtpNumber => &data.verification.ktp_number,
        }
    }

    /// Patch that sets only this field.
    pub fn patch(&self, value: String) -> FieldPatch {
        match self {
            Self::FullName => FieldPatch::Profile(ProfilePatch {
                full_name: Some(value),
                ..Default::default()
            }),
            Self::Phone => FieldPatch::Profile(ProfilePatch {
                phone: Some(value),
                ..Default::default()
            }),
            Self::Email => FieldPatch::Profile(ProfilePatch {
                email: Some(value),
                ..Default::default()
            }),
            Self::Address => FieldPatch::Profile(ProfilePatch {
                address: Some(value),
                ..Default::default()
            }),
            Self::Province => FieldPatch::Profile(ProfilePatch {
                province: Some(value),
                ..Default::default()
            }),
            Self::Regency => FieldPatch::Profile(ProfilePatch {
                regency: Some(value),
                ..Default::default()
            }),
            Self::StoreName => FieldPatch::Store(StorePatch {
                store_name: Some(value),
                ..Default::default()
            }),
            Self::StoreAddress => FieldPatch::Store(StorePatch {
                store_address: Some(value),
                ..Default::default()
            }),
            Self::AnnualSales => FieldPatch::Store(StorePatch {
                annual_sales: Some(value),
                ..Default::default()
            }),
            Self::KtpNumber => FieldPatch::Verification(VerificationPatch {
                ktp_number: Some(value),
                ..Default::default()
            }),
        }
    }
}

impl FieldSpec {
    /// Apply the field's input limit. Nothing else is checked.
    pub fn normalize_input(&self, raw: &str) -> String {
        match self.max_len {
            Some(max) => raw.chars().take(max).collect(),
            None => raw.to_string(),
        }
    }
}

/// Label shown in the progress stepper. Summary has no stepper entry.
pub fn step_label(step: Step) -> Option<&'static str> {
    match step {
        Step::Profile => Some("Profil Penjual"),
        Step::Store => Some("Rincian Toko"),
        Step::Verification => Some("Verifikasi Keamanan"),
        Step::Summary => None,
    }
}

/// Heading shown above a step's fields.
pub fn step_heading(step: Step) -> &'static str {
    match step {
        Step::Profile => "Informasi Dasar Penjual",
        Step::Store => "Informasi Toko Kopi",
        Step::Verification => "Verifikasi Identitas Penjual",
        Step::Summary => "Konfirmasi Pendaftaran",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Active,
    Completed,
    Pending,
}

/// One stepper entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    pub step: Step,
    pub label: &'static str,
    pub status: StepStatus,
}

/// Stepper state for the current step. On Summary every entry is complete.
pub fn progress(current: Step) -> Vec<StepProgress> {
    Step::ALL
        .iter()
        .filter_map(|&step| {
            let label = step_label(step)?;
            let status = if step == current {
                StepStatus::Active
            } else if current.index() > step.index() || current == Step::Summary {
                StepStatus::Completed
            } else {
                StepStatus::Pending
            };
            Some(StepProgress {
                step,
                label,
                status,
            })
        })
        .collect()
}

/// Rows of the confirmation table on the summary step.
pub fn review_rows(data: &RegistrationData) -> Vec<(&'static str, String)> {
    let document_status = if data.verification.has_photo() {
        "Terunggah"
    } else {
        "Belum diunggah"
    };
    vec![
        ("Nama Penjual", data.profile.full_name.clone()),
        ("Nama Toko", data.store.store_name.clone()),
        (
            "Estimasi Sales",
            format!("{} kg/tahun", data.store.annual_sales),
        ),
        ("Status Dokumen", document_status.to_string()),
    ]
}
