//! Tesseract TSV 출력 파서.
//!
//! 열: level, page_num, block_num, par_num, line_num, word_num,
//! left, top, width, height, conf, text. 단어 행(level 5)만 추출한다.

use glance_core::models::text::{BoundingBox, OcrWord};
use tracing::trace;

/// 단어 단위 행의 level 값
const WORD_LEVEL: u32 = 5;

/// TSV 텍스트를 단어 목록으로 변환
///
/// 헤더 행, 단어 외 행, 열 개수가 맞지 않는 행은 건너뛴다.
/// 텍스트 열이 없거나 비어 있는 단어는 그대로 포함한다 (필터는 호출 측 몫).
pub fn parse_words(tsv: &str) -> Vec<OcrWord> {
    tsv.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<OcrWord> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 11 {
        return None;
    }

    let level: u32 = cols[0].trim().parse().ok()?;
    if level != WORD_LEVEL {
        return None;
    }

    let left: i32 = cols[6].trim().parse().ok()?;
    let top: i32 = cols[7].trim().parse().ok()?;
    let width: u32 = cols[8].trim().parse().ok()?;
    let height: u32 = cols[9].trim().parse().ok()?;
    let confidence: f32 = cols[10].trim().parse().ok()?;
    // 텍스트 안의 탭은 없지만 혹시 모를 분할분은 다시 이어 붙임
    let text = if cols.len() > 11 {
        cols[11..].join("\t")
    } else {
        String::new()
    };

    trace!("TSV 단어: '{text}' conf={confidence}");

    Some(OcrWord {
        text,
        bbox: BoundingBox {
            x: left,
            y: top,
            width,
            height,
        },
        confidence,
    })
}
