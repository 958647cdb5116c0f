//! Registration record, partial patches, and the typed snapshot sent to
//! the summary composer.

use serde::{Deserialize, Serialize};

use super::media::ImageSelection;

/// Seller identity and domicile. All free text; nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub province: String,
    pub regency: String,
}

/// Store details. `annual_sales` is kilograms per year, kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDetails {
    pub store_name: String,
    pub store_address: String,
    pub annual_sales: String,
}

/// An uploaded KTP photo together with its `data:` URI preview.
///
/// Holding both in one value means the record can never carry a photo
/// without a preview or a preview without a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KtpPhoto {
    pub image: ImageSelection,
    pub preview: String,
}

/// Identity verification data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityVerification {
    /// NIK from the KTP. Meant to be 16 digits; the length is not checked.
    pub ktp_number: String,
    photo: Option<KtpPhoto>,
}

impl SecurityVerification {
    pub fn new(ktp_number: impl Into<String>) -> Self {
        Self {
            ktp_number: ktp_number.into(),
            photo: None,
        }
    }

    pub fn photo(&self) -> Option<&KtpPhoto> {
        self.photo.as_ref()
    }

    /// The binary image handle, if a photo is attached.
    pub fn ktp_photo(&self) -> Option<&ImageSelection> {
        self.photo.as_ref().map(|p| &p.image)
    }

    /// The renderable preview, if a photo is attached.
    pub fn ktp_photo_preview(&self) -> Option<&str> {
        self.photo.as_ref().map(|p| p.preview.as_str())
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn snapshot(&self) -> VerificationSnapshot {
        VerificationSnapshot {
            ktp_number: self.ktp_number.clone(),
            ktp_photo_attached: self.photo.is_some(),
            ktp_photo_name: self.photo.as_ref().map(|p| p.image.file_name.clone()),
            ktp_photo_type: self.photo.as_ref().map(|p| p.image.mime_type.clone()),
        }
    }
}

/// Partial update for [`SellerProfile`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub province: Option<String>,
    pub regency: Option<String>,
}

/// Partial update for [`StoreDetails`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorePatch {
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub annual_sales: Option<String>,
}

/// Partial update for [`SecurityVerification`].
///
/// `ktp_photo: Some(None)` clears the photo and its preview together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationPatch {
    pub ktp_number: Option<String>,
    pub ktp_photo: Option<Option<KtpPhoto>>,
}

fn merge(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl SellerProfile {
    pub fn apply(&mut self, patch: ProfilePatch) {
        merge(&mut self.full_name, patch.full_name);
        merge(&mut self.phone, patch.phone);
        merge(&mut self.email, patch.email);
        merge(&mut self.address, patch.address);
        merge(&mut self.province, patch.province);
        merge(&mut self.regency, patch.regency);
    }
}

impl StoreDetails {
    pub fn apply(&mut self, patch: StorePatch) {
        merge(&mut self.store_name, patch.store_name);
        merge(&mut self.store_address, patch.store_address);
        merge(&mut self.annual_sales, patch.annual_sales);
    }
}

impl SecurityVerification {
    pub fn apply(&mut self, patch: VerificationPatch) {
        merge(&mut self.ktp_number, patch.ktp_number);
        if let Some(photo) = patch.ktp_photo {
            self.photo = photo;
        }
    }
}

/// Everything collected during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationData {
    pub profile: SellerProfile,
    pub store: StoreDetails,
    pub verification: SecurityVerification,
}

impl RegistrationData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) {
        self.profile.apply(patch);
    }

    pub fn update_store(&mut self, patch: StorePatch) {
        self.store.apply(patch);
    }

    pub fn update_verification(&mut self, patch: VerificationPatch) {
        self.verification.apply(patch);
    }

    /// Typed, serializable view of the whole record.
    pub fn snapshot(&self) -> RegistrationSnapshot {
        RegistrationSnapshot {
            profile: self.profile.clone(),
            store: self.store.clone(),
            verification: self.verification.snapshot(),
        }
    }
}

/// Verification data as shared with remote services: photo metadata only,
/// never the image bytes or the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSnapshot {
    pub ktp_number: String,
    pub ktp_photo_attached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ktp_photo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ktp_photo_type: Option<String>,
}

/// Full-record payload for the summary composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSnapshot {
    pub profile: SellerProfile,
    pub store: StoreDetails,
    pub verification: VerificationSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> KtpPhoto {
        KtpPhoto {
            image: ImageSelection::new("ktp.png", "image/png", vec![1, 2, 3]),
            preview: "data:image/png;base64,AQID".to_string(),
        }
    }

    fn filled() -> RegistrationData {
        let mut data = RegistrationData::new();
        data.update_profile(ProfilePatch {
            full_name: Some("Budi Santoso".into()),
            phone: Some("62812000".into()),
            email: Some("budi@example.com".into()),
            address: Some("Jl. Merdeka 1".into()),
            province: Some("Sumatera Selatan".into()),
            regency: Some("Lahat".into()),
        });
        data.update_store(StorePatch {
            store_name: Some("Kopi Jaya Makmur".into()),
            store_address: Some("Pasar Lahat".into()),
            annual_sales: Some("1000".into()),
        });
        data.update_verification(VerificationPatch {
            ktp_number: Some("1234567890123456".into()),
            ktp_photo: None,
        });
        data
    }

    #[test]
    fn new_record_is_empty() {
        let data = RegistrationData::new();
        assert!(data.profile.full_name.is_empty());
        assert!(data.store.annual_sales.is_empty());
        assert!(data.verification.ktp_number.is_empty());
        assert!(data.verification.ktp_photo().is_none());
        assert!(data.verification.ktp_photo_preview().is_none());
    }

    #[test]
    fn single_field_update_leaves_everything_else_alone() {
        let before = filled();
        let mut after = before.clone();
        after.update_profile(ProfilePatch {
            phone: Some("62899999".into()),
            ..Default::default()
        });

        assert_eq!(after.profile.phone, "62899999");
        assert_eq!(after.profile.full_name, before.profile.full_name);
        assert_eq!(after.profile.email, before.profile.email);
        assert_eq!(after.profile.address, before.profile.address);
        assert_eq!(after.profile.province, before.profile.province);
        assert_eq!(after.profile.regency, before.profile.regency);
        assert_eq!(after.store, before.store);
        assert_eq!(after.verification, before.verification);
    }

    #[test]
    fn store_update_leaves_profile_and_verification_alone() {
        let before = filled();
        let mut after = before.clone();
        after.update_store(StorePatch {
            annual_sales: Some("2500".into()),
            ..Default::default()
        });
        assert_eq!(after.store.annual_sales, "2500");
        assert_eq!(after.store.store_name, before.store.store_name);
        assert_eq!(after.profile, before.profile);
        assert_eq!(after.verification, before.verification);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let before = filled();
        let mut after = before.clone();
        after.update_profile(ProfilePatch::default());
        after.update_store(StorePatch::default());
        after.update_verification(VerificationPatch::default());
        assert_eq!(after, before);
    }

    #[test]
    fn photo_and_preview_move_together() {
        let mut data = filled();
        data.update_verification(VerificationPatch {
            ktp_photo: Some(Some(photo())),
            ..Default::default()
        });
        assert!(data.verification.ktp_photo().is_some());
        assert!(data.verification.ktp_photo_preview().is_some());
        assert_eq!(data.verification.ktp_number, "1234567890123456");

        data.update_verification(VerificationPatch {
            ktp_photo: Some(None),
            ..Default::default()
        });
        assert!(data.verification.ktp_photo().is_none());
        assert!(data.verification.ktp_photo_preview().is_none());
        assert_eq!(data.verification.ktp_number, "1234567890123456");
    }

    #[test]
    fn ktp_number_length_is_not_enforced() {
        let mut data = RegistrationData::new();
        data.update_verification(VerificationPatch {
            ktp_number: Some("123".into()),
            ..Default::default()
        });
        assert_eq!(data.verification.ktp_number, "123");
    }

    #[test]
    fn snapshot_uses_camel_case_and_omits_photo_bytes() {
        let mut data = filled();
        data.update_verification(VerificationPatch {
            ktp_photo: Some(Some(photo())),
            ..Default::default()
        });
        let json = serde_json::to_value(data.snapshot()).unwrap();
        assert_eq!(json["profile"]["fullName"], "Budi Santoso");
        assert_eq!(json["store"]["annualSales"], "1000");
        assert_eq!(json["verification"]["ktpNumber"], "1234567890123456");
        assert_eq!(json["verification"]["ktpPhotoAttached"], true);
        assert_eq!(json["verification"]["ktpPhotoName"], "ktp.png");
        let raw = json.to_string();
        assert!(!raw.contains("base64"));
    }

    #[test]
    fn snapshot_without_photo_skips_metadata() {
        let json = serde_json::to_value(RegistrationData::new().snapshot()).unwrap();
        assert_eq!(json["verification"]["ktpPhotoAttached"], false);
        assert!(json["verification"].get("ktpPhotoName").is_none());
    }
}
