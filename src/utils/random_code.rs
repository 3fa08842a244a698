use rand::Rng;

/// 生成招生申请的恢复令牌（UUID v4，无连字符的 32 位十六进制）
pub fn generate_resume_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 校验恢复令牌格式，格式不对的直接当作不存在处理
pub fn is_valid_resume_token(token: &str) -> bool {
    token.len() == 32
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// 生成随机密码
pub fn generate_random_password(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_token_format() {
        let token = generate_resume_token();
        assert_eq!(token.len(), 32);
        assert!(is_valid_resume_token(&token));
        assert_ne!(token, generate_resume_token());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(!is_valid_resume_token(""));
        assert!(!is_valid_resume_token("not-a-token"));
        assert!(!is_valid_resume_token(
            "550e8400-e29b-41d4-a716-446655440000"
        ));
        assert!(!is_valid_resume_token("550E8400E29B41D4A716446655440000"));
    }

    #[test]
    fn test_random_password_length() {
        assert_eq!(generate_random_password(16).chars().count(), 16);
    }
}
