use async_trait::async_trait;
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

use crate::domain::{DataAccessError, Entity, Id};

const PHONE_DIGITS_MIN: usize = 7;
const PHONE_DIGITS_MAX: usize = 15;

/// お客様リポジトリ
#[async_trait]
pub trait CustomerRepository {
    /// IDでお客様を検索する
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError>;
    /// すべてのお客様を取得する
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError>;
    /// メールアドレスでお客様を検索する（大文字小文字は区別しない）
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DataAccessError>;
}

/// お客様ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct CustomerId(u64);

impl Id for CustomerId {
    type Inner = u64;
}

/// お客様エンティティ
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    name: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    address: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    phone_number: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    email: String,
}

impl Customer {
    pub fn create(
        id: CustomerId,
        name: &str,
        address: &str,
        phone_number: &str,
        email: &str,
    ) -> Result<Self, CustomerError> {
        let name = Self::validate_name(name)?;
        let address = Self::validate_address(address)?;
        let phone_number = Self::validate_phone_number(phone_number)?;
        let email = Self::validate_email(email)?;
        Ok(Customer {
            id,
            name,
            address,
            phone_number,
            email,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn has_email(&self, email: &str) -> bool {
        let email = email.trim();
        !email.is_empty() && self.email.eq_ignore_ascii_case(email)
    }

    /// 名前とメールは大文字小文字を区別せず、電話番号はそのまま部分一致
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        let lower = term.to_lowercase();
        self.name.to_lowercase().contains(&lower)
            || self.email.to_lowercase().contains(&lower)
            || self.phone_number.contains(term)
    }

    /// 同じメールアドレスのお客様がいれば登録できない
    pub fn ensure_email_available(
        customers: &[Customer],
        email: &str,
    ) -> Result<(), CustomerError> {
        match customers.iter().any(|c| c.has_email(email)) {
            true => Err(CustomerError::DuplicateEmail),
            false => Ok(()),
        }
    }

    fn validate_name(name: &str) -> Result<String, CustomerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CustomerError::NameRequired);
        }
        Ok(name.to_owned())
    }

    fn validate_address(address: &str) -> Result<String, CustomerError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(CustomerError::AddressRequired);
        }
        Ok(address.to_owned())
    }

    fn validate_phone_number(phone_number: &str) -> Result<String, CustomerError> {
        let phone_number = phone_number.trim();
        let digits = phone_number.strip_prefix('+').unwrap_or(phone_number);
        let valid = (PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(CustomerError::InvalidPhoneNumber);
        }
        Ok(phone_number.to_owned())
    }

    fn validate_email(email: &str) -> Result<String, CustomerError> {
        let email = email.trim();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain
                        .split('.')
                        .filter(|label| !label.is_empty())
                        .count()
                        >= 2
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(CustomerError::InvalidEmail);
        }
        Ok(email.to_owned())
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    const ENTITY_NAME: &'static str = "customer";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// 検索語に一致するお客様を名前順で返す
pub fn search_customers<'a>(customers: &'a [Customer], term: &str) -> Vec<&'a Customer> {
    let mut found = customers
        .iter()
        .filter(|customer| customer.matches(term))
        .collect::<Vec<_>>();
    found.sort_by_key(|customer| customer.name.to_lowercase());
    found
}

/// お客様エラー
#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum CustomerError {
    /// 名前が空欄です
    #[display(fmt = "Name cannot be blank")]
    NameRequired,
    /// 住所が空欄です
    #[display(fmt = "Address cannot be blank")]
    AddressRequired,
    /// 電話番号が不正です
    #[display(fmt = "Enter a valid phone number")]
    InvalidPhoneNumber,
    /// メールアドレスが不正です
    #[display(fmt = "Enter a valid email address")]
    InvalidEmail,
    /// メールアドレスが登録済みです
    #[display(fmt = "Email is already registered")]
    DuplicateEmail,
}
