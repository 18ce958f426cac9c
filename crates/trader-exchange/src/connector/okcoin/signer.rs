//! OKCoin v1 요청 서명.
//!
//! 서명 절차:
//! 1. `api_key=<access key>` 추가
//! 2. 모든 파라미터를 사전순 정렬
//! 3. `secret_key=<secret key>` 추가 (정렬 이후, 마지막 위치)
//! 4. `&`로 연결한 전체 문자열의 MD5를 대문자 hex로 계산
//! 5. `sign=<digest>` 추가
//!
//! 시크릿 키도 전송 파라미터에 그대로 포함됩니다.

use md5::{Digest, Md5};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// 서명이 끝난 요청 파라미터.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedParams {
    params: Vec<String>,
    signature: String,
}

impl SignedParams {
    /// 대문자 hex MD5 서명.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// 전송 순서대로의 `key=value` 목록 (`sign` 포함).
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// form 본문 (`&`로 연결).
    pub fn to_body(&self) -> String {
        self.params.join("&")
    }
}

impl fmt::Debug for SignedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // secret_key 파라미터는 출력하지 않는다
        let visible: Vec<&str> = self
            .params
            .iter()
            .filter(|p| !p.starts_with("secret_key="))
            .map(String::as_str)
            .collect();
        f.debug_struct("SignedParams")
            .field("params", &visible)
            .field("signature", &self.signature)
            .finish()
    }
}

/// 서명자.
pub struct Signer {
    access_key: String,
    secret_key: SecretString,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("access_key", &"***REDACTED***")
            .field("secret_key", &"***REDACTED***")
            .finish()
    }
}

impl Signer {
    /// 새 서명자 생성.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        let secret: String = secret_key.into();
        Self {
            access_key: access_key.into(),
            secret_key: SecretString::new(secret.into()),
        }
    }

    /// 파라미터에 자격증명과 서명을 붙입니다.
    ///
    /// 입력 순서와 무관하게 같은 파라미터 집합이면 같은 서명이 나옵니다.
    pub fn sign<I, S>(&self, params: I) -> SignedParams
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut params: Vec<String> = params.into_iter().map(Into::into).collect();
        params.push(format!("api_key={}", self.access_key));
        params.sort();
        params.push(format!("secret_key={}", self.secret_key.expose_secret()));

        let signature = md5_upper_hex(&params.join("&"));
        params.push(format!("sign={}", signature));

        SignedParams { params, signature }
    }
}

fn md5_upper_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode_upper(hasher.finalize())
}
