//! InMemory Repository 実装
//!
//! HashMap をインメモリ DB として使用します。プロセスが終了すると状態は失われます。

mod hand_state;
mod member;

pub use hand_state::InMemoryHandStateRepository;
pub use member::InMemoryMemberRepository;
