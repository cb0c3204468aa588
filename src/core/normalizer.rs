use crate::domain::model::{
    DailyTrendRecord, RealtimeTrendRecord, TrendSource, UnifiedKeyword, VideoTrendRecord,
};
use crate::domain::ports::KeywordCandidate;
use std::collections::HashMap;

/// 比對用的關鍵字：去頭尾空白、壓縮內部空白、Unicode 大小寫折疊
///
/// 先轉大寫再轉小寫，讓 `ß`/`SS`、`ς`/`σ` 這類只有單向對應的字元也能合併。
pub fn canonical_key(keyword: &str) -> String {
    let collapsed = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_uppercase().to_lowercase()
}

struct Entry {
    keyword: UnifiedKeyword,
    origin: TrendSource,
}

#[derive(Default)]
struct KeywordMerger {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl KeywordMerger {
    fn push_all<C: KeywordCandidate>(&mut self, records: &[C]) {
        for record in records {
            self.push(record);
        }
    }

    fn push<C: KeywordCandidate>(&mut self, record: &C) {
        let key = canonical_key(record.keyword());
        if key.is_empty() {
            return;
        }

        match self.index.get(&key) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                if entry.origin == C::SOURCE {
                    return;
                }
                // 顯示欄位整組沿用先出現者，只改標籤
                entry.keyword.source = TrendSource::Multi;
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(Entry {
                    keyword: UnifiedKeyword {
                        keyword: record.keyword().trim().to_string(),
                        source: C::SOURCE,
                        details: record.details().map(str::to_string),
                        url: record.url().map(str::to_string),
                    },
                    origin: C::SOURCE,
                });
            }
        }
    }

    fn finish(self, limit: usize) -> Vec<UnifiedKeyword> {
        self.entries
            .into_iter()
            .take(limit)
            .map(|e| e.keyword)
            .collect()
    }
}

/// 合併三個來源的關鍵字，依 realtime > daily > youtube 的優先順序排列
pub fn normalize(
    daily: &[DailyTrendRecord],
    realtime: &[RealtimeTrendRecord],
    youtube: &[VideoTrendRecord],
    limit: usize,
) -> Vec<UnifiedKeyword> {
    if limit == 0 {
        return Vec::new();
    }

    let mut merger = KeywordMerger::default();
    merger.push_all(realtime);
    merger.push_all(daily);
    merger.push_all(youtube);
    merger.finish(limit)
}
