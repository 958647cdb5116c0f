//! Prompt text for the remote assistant and summary composer, plus the
//! local fallback texts used when the remote service is unavailable.

use super::model::{RegistrationData, RegistrationSnapshot};
use super::state::Step;

/// The question sent when the seller asks for help on the current step.
pub const ASSISTANT_QUESTION: &str =
    "Jelaskan langkah ini dan apa yang harus saya siapkan sebagai pemilik toko?";

/// Shown instead of the assistant's answer when the remote call fails.
pub const ASSISTANT_FALLBACK: &str = "Maaf, saya sedang mengalami kendala teknis. Silakan lanjutkan pengisian formulir pendaftaran toko Anda.";

/// System instruction for seller help.
pub const ASSISTANT_SYSTEM_INSTRUCTION: &str = "\
Answer briefly and warmly in Indonesian. Help the seller understand why we need their \
'Nama Toko', 'Alamat Toko', 'Estimasi Penjualan', or why we need their KTP. \
Address them as 'Mitra Penjual' or 'Pemilik Toko'.";

pub const ASSISTANT_TEMPERATURE: f32 = 0.7;
pub const SUMMARY_TEMPERATURE: f32 = 0.5;

/// Describe where the seller is and what they have entered so far.
///
/// Uses the current step's sub-record; on Summary the profile is used. The
/// verification part never carries the photo bytes or preview.
pub fn assistant_context(step: Step, data: &RegistrationData) -> String {
    // Serialized straight from the structs so keys keep declaration order.
    let value = match step {
        Step::Profile | Step::Summary => serde_json::to_string(&data.profile),
        Step::Store => serde_json::to_string(&data.store),
        Step::Verification => serde_json::to_string(&data.verification.snapshot()),
    }
    .unwrap_or_else(|_| "{}".to_string());

    format!("Seller is at step {step}. Data so far: {value}")
}

/// Build the user prompt for a help question.
pub fn assistant_prompt(question: &str, context: &str) -> String {
    format!(
        "You are a helpful assistant for Petanikopiku, a coffee commerce platform.\n\
         The user is a seller (penjual) registering their store (toko).\n\
         Current form context: {context}\n\
         User question: {question}"
    )
}

/// Build the prompt asking the model for an admin-facing summary.
pub fn summary_prompt(snapshot: &RegistrationSnapshot) -> Result<String, serde_json::Error> {
    let details = serde_json::to_string(snapshot)?;
    Ok(format!(
        "Generate a professional registration summary for a coffee store owner (penjual) \
         with these details: {details}.\n\
         The summary will be sent to an admin via WhatsApp.\n\
         Format it neatly with emojis and clear sections. Use formal Indonesian. \
         Use the term 'Informasi Toko'."
    ))
}

/// Deterministic summary used when the composer returns nothing.
///
/// Field values are substituted verbatim, empty ones included.
pub fn fallback_summary(data: &RegistrationData) -> String {
    let profile = &data.profile;
    let store = &data.store;
    let verification = &data.verification;

    format!(
        "*Pendaftaran Mitra Penjual Baru - Petanikopiku*\n\
         \n\
         *Profil Penjual:*\n\
         - Nama: {full_name}\n\
         - No. HP: {phone}\n\
         - Domisili: {regency}, {province}\n\
         \n\
         *Rincian Toko:*\n\
         - Nama Toko: {store_name}\n\
         - Alamat Toko: {store_address}\n\
         - Estimasi Penjualan: {annual_sales} kg/tahun\n\
         \n\
         *Verifikasi:*\n\
         - No KTP: {ktp_number}",
        full_name = profile.full_name,
        phone = profile.phone,
        regency = profile.regency,
        province = profile.province,
        store_name = store.store_name,
        store_address = store.store_address,
        annual_sales = store.annual_sales,
        ktp_number = verification.ktp_number,
    )
    .trim()
    .to_string()
}
