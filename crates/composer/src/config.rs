//! Branding configuration
//!
//! Every piece of brand text on the document is injected here rather
//! than hardcoded in the renderer. Defaults reproduce the Web3DPrint
//! order summary.

use serde::Deserialize;

/// Brand text placed on the document
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Large brand name in the header, left side
    pub brand_name: String,
    /// Document title in the header, right side
    pub document_title: String,
    /// Long organization name under the generation date
    pub organization: String,
    /// Short organization name used in the copyright line
    pub organization_short: String,
    /// Legal boilerplate paragraph in the page footer
    pub legal_text: String,
    /// Closing paragraph after the items table
    pub closing_notes: String,
}

const DEFAULT_LEGAL_TEXT: &str = "Web3DPrint Ltd (Company No. [INSERT NUMBER]) is a \
platform connecting makers and 3D printer owners worldwide. Our registered address is \
[INSERT UK ADDRESS]. Web3DPrint Ltd is registered in England and Wales. We facilitate \
transactions between users but do not directly provide 3D printing services. We are not \
responsible for the quality of 3D printed items or any damages resulting from their use. \
Payment processing is handled by Stripe Payments UK Ltd, which is authorised by the \
Financial Conduct Authority under the Payment Services Regulations 2017 for the provision \
of payment services (Firm Reference Number: 900461). Web3DPrint Ltd is committed to \
protecting your personal data in accordance with applicable data protection laws, \
including the UK General Data Protection Regulation (UK GDPR) and the Data Protection Act \
2018. For disputes related to 3D printing services, please contact the service provider \
directly. For platform-related issues, contact our customer support at \
SUPPORT@WEB3DPRINT.COM. By using Web3DPrint, you agree to our Terms of Service and \
Privacy Policy, available at WEB3DPRINT.COM.";

const DEFAULT_CLOSING_NOTES: &str = "Thank you for your order. If you have any questions \
about this order summary, please contact our customer support team.";

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            brand_name: "Web3DPrint".to_string(),
            document_title: "Order Summary".to_string(),
            organization: "Web3DPrint Limited".to_string(),
            organization_short: "Web3DPrint Ltd".to_string(),
            legal_text: DEFAULT_LEGAL_TEXT.to_string(),
            closing_notes: DEFAULT_CLOSING_NOTES.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let branding = BrandingConfig::default();
        assert_eq!(branding.brand_name, "Web3DPrint");
        assert_eq!(branding.document_title, "Order Summary");
        assert!(branding.legal_text.contains("registered in England and Wales"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let branding: BrandingConfig =
            serde_json::from_str(r#"{"brand_name": "Acme"}"#).unwrap();
        assert_eq!(branding.brand_name, "Acme");
        assert_eq!(branding.document_title, "Order Summary");
    }
}
