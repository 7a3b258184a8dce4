/// User-facing message catalogs
///
/// Every terminal message names the restart command; every recoverable one
/// states what budget is left (attempts, resends or seconds).
use super::types::{FailureKind, TokenStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

/// Digit-grouped input form the user is asked to type ("1 2 3 4 5")
pub fn format_code_hint(length: usize) -> String {
    (1..=length)
        .map(|i| (i % 10).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Codes never reach the logs
pub fn mask_code(code: &str) -> String {
    "*".repeat(code.chars().count())
}

/// First characters of a handle or token plus its length
pub fn shorten_secret(secret: &str) -> String {
    let head: String = secret.chars().take(6).collect();
    format!("{}…({} chars)", head, secret.chars().count())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
    restart_command: String,
    code_length: usize,
}

impl Messages {
    pub fn new(locale: Locale, restart_command: impl Into<String>, code_length: usize) -> Self {
        Self {
            locale,
            restart_command: restart_command.into(),
            code_length,
        }
    }

    fn hint(&self) -> String {
        format_code_hint(self.code_length)
    }

    pub fn code_sent(&self) -> String {
        match self.locale {
            Locale::English => format!(
                "Verification code sent to your phone. Please enter the code in this format: {}",
                self.hint()
            ),
            Locale::Arabic => format!(
                "تم إرسال رمز التحقق إلى رقم هاتفك. يرجى إدخال الرمز بالصيغة التالية: {}",
                self.hint()
            ),
        }
    }

    pub fn success(&self) -> String {
        match self.locale {
            Locale::English => "✅ Logged in successfully!".to_string(),
            Locale::Arabic => "✅ تم تسجيل الدخول بنجاح!".to_string(),
        }
    }

    pub fn token_status(&self, status: &TokenStatus) -> String {
        let cmd = &self.restart_command;
        match (self.locale, status) {
            (Locale::English, TokenStatus::Valid(profile)) => {
                format!("Valid session for {}", profile.summary())
            }
            (Locale::Arabic, TokenStatus::Valid(profile)) => {
                format!("جلسة صالحة لـ {}", profile.summary())
            }
            (Locale::English, TokenStatus::Unauthorized) => {
                format!("Invalid session. Please log in again with {}.", cmd)
            }
            (Locale::Arabic, TokenStatus::Unauthorized) => {
                format!("جلسة غير صالحة. يرجى تسجيل الدخول مرة أخرى باستخدام الأمر {}.", cmd)
            }
            (Locale::English, TokenStatus::Error(description)) => {
                format!("❌ An error occurred while checking the session: {}", description)
            }
            (Locale::Arabic, TokenStatus::Error(description)) => {
                format!("❌ حدث خطأ أثناء التحقق من صلاحية الجلسة: {}", description)
            }
        }
    }

    /// Text for a failure; `retryable` selects the recoverable or terminal wording
    pub fn failure(&self, kind: &FailureKind, retryable: bool) -> String {
        match self.locale {
            Locale::English => self.failure_en(kind, retryable),
            Locale::Arabic => self.failure_ar(kind, retryable),
        }
    }

    fn failure_en(&self, kind: &FailureKind, retryable: bool) -> String {
        let cmd = &self.restart_command;
        let hint = self.hint();
        match kind {
            FailureKind::RateLimited { wait_seconds } => format!(
                "⚠️ Your account is temporarily restricted. Please wait {} seconds before trying again.",
                wait_seconds
            ),
            FailureKind::InvalidCode { remaining_attempts } if retryable => format!(
                "❌ Invalid verification code. Please check the code and enter it in this format: {}\n\nYou have {} attempts left.",
                hint, remaining_attempts
            ),
            FailureKind::InvalidCode { .. } => format!(
                "⚠️ You have exceeded the maximum number of code attempts. Please use {} to start over.",
                cmd
            ),
            FailureKind::CodeExpired { remaining_resends } if retryable => format!(
                "❌ The verification code expired.\n\nA new code was sent to your phone. Please enter the new code in this format: {}\n\nYou have {} code resends left.",
                hint, remaining_resends
            ),
            FailureKind::CodeExpired { .. } => format!(
                "⚠️ You have exceeded the maximum number of code resends. Please use {} to start over.",
                cmd
            ),
            FailureKind::MalformedCode => format!(
                "❌ The code must contain {} digits. Please enter it in this format: {}",
                self.code_length, hint
            ),
            FailureKind::PasswordRequired => {
                "This account is protected by a password. Please enter the password.".to_string()
            }
            FailureKind::PasswordInvalid => {
                "❌ Incorrect password. Please enter the password again, the verification code does not need to be repeated.".to_string()
            }
            FailureKind::InvalidPhoneNumber => format!(
                "❌ Invalid phone number. Use the international format, for example +15551234567. Please use {} to try again.",
                cmd
            ),
            FailureKind::PhoneBanned => format!(
                "⛔ This phone number is banned. Please use {} with another number.",
                cmd
            ),
            FailureKind::TransientRemoteError { description } => format!(
                "❌ An error occurred during login: {}\n\nPlease use {} to try again.",
                description, cmd
            ),
            FailureKind::NoPendingAttempt => {
                format!("⚠️ No login in progress. Please use {} to start.", cmd)
            }
            FailureKind::VerificationInProgress => {
                "⏳ A previous request for this account is still being processed. Please wait a moment.".to_string()
            }
            FailureKind::SessionUnauthorized => {
                format!("Invalid session. Please log in again with {}.", cmd)
            }
            FailureKind::StorageFailure { description } => format!(
                "❌ Could not save your login data: {}\n\nPlease use {} to try again.",
                description, cmd
            ),
        }
    }

    fn failure_ar(&self, kind: &FailureKind, retryable: bool) -> String {
        let cmd = &self.restart_command;
        let hint = self.hint();
        match kind {
            FailureKind::RateLimited { wait_seconds } => format!(
                "⚠️ تم تقييد حسابك مؤقتًا. يرجى الانتظار {} ثانية قبل المحاولة مرة أخرى.",
                wait_seconds
            ),
            FailureKind::InvalidCode { remaining_attempts } if retryable => format!(
                "❌ رمز التحقق غير صحيح. يرجى التأكد من الرمز وإدخاله بالصيغة التالية: {}\n\nمتبقي لديك {} محاولات.",
                hint, remaining_attempts
            ),
            FailureKind::InvalidCode { .. } => format!(
                "⚠️ لقد تجاوزت الحد الأقصى لمحاولات إدخال الرمز. يرجى استخدام الأمر {} للبدء من جديد.",
                cmd
            ),
            FailureKind::CodeExpired { remaining_resends } if retryable => format!(
                "❌ انتهت صلاحية رمز التحقق.\n\nتم إرسال رمز جديد إلى هاتفك. يرجى إدخال الرمز الجديد بالصيغة التالية: {}\n\nمتبقي لديك {} محاولات لإعادة إرسال الرمز.",
                hint, remaining_resends
            ),
            FailureKind::CodeExpired { .. } => format!(
                "⚠️ لقد تجاوزت الحد الأقصى لمحاولات إعادة إرسال الرمز. يرجى استخدام الأمر {} للبدء من جديد.",
                cmd
            ),
            FailureKind::MalformedCode => format!(
                "❌ يجب أن يتكون الرمز من {} أرقام. يرجى إدخاله بالصيغة التالية: {}",
                self.code_length, hint
            ),
            FailureKind::PasswordRequired => {
                "هذا الحساب محمي بكلمة مرور. يرجى إدخال كلمة المرور.".to_string()
            }
            FailureKind::PasswordInvalid => {
                "❌ كلمة المرور غير صحيحة. يرجى إدخال كلمة المرور مرة أخرى، ولا حاجة لإعادة إدخال رمز التحقق.".to_string()
            }
            FailureKind::InvalidPhoneNumber => format!(
                "❌ رقم الهاتف غير صالح. استخدم الصيغة الدولية مثل +15551234567. يرجى استخدام الأمر {} للمحاولة مرة أخرى.",
                cmd
            ),
            FailureKind::PhoneBanned => format!(
                "⛔ رقم الهاتف هذا محظور. يرجى استخدام الأمر {} برقم آخر.",
                cmd
            ),
            FailureKind::TransientRemoteError { description } => format!(
                "❌ حدث خطأ أثناء تسجيل الدخول: {}\n\nيرجى استخدام الأمر {} للمحاولة مرة أخرى.",
                description, cmd
            ),
            FailureKind::NoPendingAttempt => format!(
                "⚠️ لا توجد عملية تسجيل دخول جارية. يرجى استخدام الأمر {} للبدء.",
                cmd
            ),
            FailureKind::VerificationInProgress => {
                "⏳ لا يزال طلب سابق لهذا الحساب قيد المعالجة. يرجى الانتظار قليلًا.".to_string()
            }
            FailureKind::SessionUnauthorized => format!(
                "جلسة غير صالحة. يرجى تسجيل الدخول مرة أخرى باستخدام الأمر {}.",
                cmd
            ),
            FailureKind::StorageFailure { description } => format!(
                "❌ تعذر حفظ بيانات تسجيل الدخول: {}\n\nيرجى استخدام الأمر {} للمحاولة مرة أخرى.",
                description, cmd
            ),
        }
    }
}
