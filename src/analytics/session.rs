//! 会话 ID 与访问次数

use tracing::{debug, trace};

use super::clock::Clock;
use crate::storage::{KeyValueStore, keys};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// 生成新的会话 ID：`session_<毫秒时间戳>_<9 位 base36 随机串>`
pub fn generate_session_id(clock: &dyn Clock) -> String {
    let mut n = rand::random::<u64>();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    format!("session_{}_{}", clock.now().timestamp_millis(), suffix)
}

/// 获取当前标签页的会话 ID，没有则生成并保存
///
/// 标签页存储不可用时每次都会得到新的 ID。
pub fn session_id(tab_store: &dyn KeyValueStore, clock: &dyn Clock) -> String {
    match tab_store.get_item(keys::SESSION_ID) {
        Ok(Some(id)) if !id.is_empty() => return id,
        Ok(_) => {}
        Err(e) => debug!("Session store read failed: {}", e),
    }

    let id = generate_session_id(clock);
    if let Err(e) = tab_store.set_item(keys::SESSION_ID, &id) {
        debug!("Session store write failed: {}", e);
    }
    trace!("New session id: {}", id);
    id
}

/// 读取已保存的访问次数，缺失或无法解析时为 0
pub fn stored_visit_count(store: &dyn KeyValueStore) -> u64 {
    parse_counter(store.get_item(keys::VISIT_COUNT).ok().flatten())
}

/// 访问次数加一并保存，返回新值
///
/// 多个标签页同时加载时没有原子性保证，后写入的覆盖先写入的。
pub fn next_visit_count(store: &dyn KeyValueStore) -> u64 {
    let count = stored_visit_count(store).saturating_add(1);
    if let Err(e) = store.set_item(keys::VISIT_COUNT, &count.to_string()) {
        debug!("Failed to persist visit count: {}", e);
    }
    count
}

/// 解析以字符串保存的整数计数器
///
/// 与 `parseInt` 一样接受前导空白和尾随的非数字字符。
pub(crate) fn parse_counter(raw: Option<String>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::clock::ManualClock;
    use crate::storage::MemoryStore;

    fn clock() -> ManualClock {
        ManualClock::new("2025-06-01T10:00:00Z".parse().unwrap())
    }

    #[test]
    fn test_generate_session_id_format() {
        let id = generate_session_id(&clock());
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert_eq!(parts[1], "1748772000000");
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_session_id_stable_within_tab() {
        let tab = MemoryStore::new();
        let clock = clock();
        let first = session_id(&tab, &clock);
        let second = session_id(&tab, &clock);
        assert_eq!(first, second);

        let other_tab = MemoryStore::new();
        assert_ne!(first, session_id(&other_tab, &clock));
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter(None), 0);
        assert_eq!(parse_counter(Some("7".into())), 7);
        assert_eq!(parse_counter(Some(" 12abc".into())), 12);
        assert_eq!(parse_counter(Some("abc".into())), 0);
        assert_eq!(parse_counter(Some("-3".into())), 0);
    }

    #[test]
    fn test_next_visit_count() {
        let store = MemoryStore::new();
        assert_eq!(next_visit_count(&store), 1);
        assert_eq!(next_visit_count(&store), 2);
        store.set_item(keys::VISIT_COUNT, "garbage").unwrap();
        assert_eq!(next_visit_count(&store), 1);
    }
}
