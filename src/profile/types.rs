//! Wire types for the user profile route.
//!
//! Every section of a profile is optional upstream; missing sections decode
//! to `None` and missing scalar fields to their defaults.

use serde::{Deserialize, Serialize};

use crate::document::DocumentReference;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub unique_id: String,
    pub email: String,
    pub name: String,
    pub full_name: Option<String>,
    pub mobile: Option<u64>,
    #[serde(rename = "IsAdimin")]
    pub is_admin: bool,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
    #[serde(rename = "isVerifiedmobile")]
    pub is_verified_mobile: bool,
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
    pub location: Option<Location>,
    #[serde(rename = "otpExpiry")]
    pub otp_expiry: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl UserRecord {
    /// Name to show: full name when present, otherwise the account name.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KycRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub unique_id: String,
    pub email: String,
    pub aadhaar_linked: bool,
    /// Storage path of the Aadhaar document, relative to the proxy prefix.
    #[serde(rename = "adharpath")]
    pub aadhaar_path: String,
    pub completed: bool,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
    pub kyc_type: String,
    pub status: String,
    pub transaction_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl KycRecord {
    /// Reference to the Aadhaar document, watermarked with the owner's unique
    /// id or `fallback`. `None` when no document was uploaded.
    pub fn document_reference(
        &self,
        user: Option<&UserRecord>,
        fallback: &str,
    ) -> Option<DocumentReference> {
        let path = self.aadhaar_path.trim();
        if path.is_empty() {
            return None;
        }
        Some(DocumentReference::new(
            path,
            user.map(|u| u.unique_id.as_str()),
            fallback,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IfscDetails {
    pub bank: String,
    pub bank_code: String,
    pub bank_name: String,
    pub branch: String,
    pub centre: String,
    pub district: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub contact: Option<String>,
    pub micr: Option<String>,
    pub swift: Option<String>,
    pub imps: bool,
    pub rtgs: bool,
    pub neft: bool,
    pub upi: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankAccountRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub unique_id: String,
    pub email: String,
    pub full_name: String,
    pub id_number: String,
    pub ifsc: String,
    pub ifsc_details: Option<IfscDetails>,
    pub account_exists: bool,
    pub imps_ref_no: Option<String>,
    pub remarks: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub unique_id: String,
    pub description: String,
    /// Decimal string as sent upstream.
    pub amount: String,
    #[serde(rename = "debtType")]
    pub debt_type: String,
    pub year: String,
    pub proof: String,
    #[serde(rename = "transactionRef")]
    pub transaction_ref: String,
    /// `true` while the debt is active.
    pub status: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Aggregated profile of one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(rename = "Userresult")]
    pub user: Option<UserRecord>,
    #[serde(rename = "kycdataresult")]
    pub kyc: Option<KycRecord>,
    #[serde(rename = "BankAccountresult")]
    pub bank_account: Option<BankAccountRecord>,
    #[serde(rename = "Debtresult")]
    pub debt: Option<DebtRecord>,
}

/// Which sections a profile carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileSections {
    pub user: bool,
    pub kyc: bool,
    pub bank_account: bool,
    pub debt: bool,
}

impl UserProfile {
    pub fn sections(&self) -> ProfileSections {
        ProfileSections {
            user: self.user.is_some(),
            kyc: self.kyc.is_some(),
            bank_account: self.bank_account.is_some(),
            debt: self.debt.is_some(),
        }
    }

    /// The Aadhaar document of this profile, if any.
    pub fn aadhaar_reference(&self, fallback: &str) -> Option<DocumentReference> {
        self.kyc
            .as_ref()
            .and_then(|kyc| kyc.document_reference(self.user.as_ref(), fallback))
    }
}

/// `result` arrives as an object or, from some deployments, a one-element list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProfileResult {
    // Tried first: a struct would also accept a sequence and misread it
    Many(Vec<UserProfile>),
    One(Box<UserProfile>),
}

impl ProfileResult {
    pub(crate) fn into_first(self) -> Option<UserProfile> {
        match self {
            ProfileResult::One(profile) => Some(*profile),
            ProfileResult::Many(list) => list.into_iter().next(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfileEnvelope {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Option<ProfileResult>,
}
