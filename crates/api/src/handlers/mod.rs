pub mod qr_codes;
pub mod templates;
