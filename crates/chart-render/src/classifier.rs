//! 지표 이름 → 페인 분류.
//!
//! 조회 순서:
//! 1. 가격 페인 목록 (정확한 이름, 그다음 긴 접두사부터)
//! 2. 보조 페인 멤버 목록 (oscillator → macd → overlay → volume)
//! 3. 일치하는 곳이 없으면 `None`
//!
//! 결과는 이름과 설정 테이블에만 의존합니다.

use crate::descriptor::{member_matches, ChartConfig, Resolved};
use crate::figure::PaneId;

impl ChartConfig {
    /// 지표 이름이 그려질 페인.
    pub fn classify(&self, name: &str) -> Option<PaneId> {
        self.resolve(name).map(|resolved| resolved.pane)
    }

    /// 페인과 적용할 디스크립터를 함께 찾습니다.
    ///
    /// 보조 페인에서는 페인을 먼저 선언 순서로 정하고,
    /// 그 페인 안에서 가장 긴 토큰의 디스크립터를 사용합니다.
    pub fn resolve(&self, name: &str) -> Option<Resolved> {
        if let Some(index) = self.main_lookup(name) {
            return Some(Resolved {
                pane: PaneId::Price,
                index,
            });
        }

        for (pane, members) in self.member_lists() {
            let best = members
                .iter()
                .filter(|(token, _)| member_matches(name, token))
                .fold(None::<&(String, usize)>, |best, candidate| match best {
                    Some(current) if current.0.len() >= candidate.0.len() => Some(current),
                    _ => Some(candidate),
                });
            if let Some((_, index)) = best {
                return Some(Resolved {
                    pane: *pane,
                    index: *index,
                });
            }
        }

        None
    }
}
