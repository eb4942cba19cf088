//! 指標名の類似度計算
//!
//! Gestalt pattern matching（Ratcliff/Obershelp）による類似度。
//! 最長共通部分文字列を見つけ、その左右の残りで同じ処理を繰り返し、
//! 一致した文字数の合計 `M` から `2M / (len(a) + len(b))` を求める。
//!
//! 再帰は明示的なスタックで処理するため、入力長に関わらず
//! 呼び出しの深さは一定。

use crate::text::normalize;
use std::collections::HashMap;

/// 一致ブロック（`a[a..a+size] == b[b..b+size]`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// 正規化した2つの文字列の類似度（0.0〜1.0）
///
/// 正規化後の文字列が等しければ 1.0、共通文字がなければ 0.0。
/// 両方とも空の場合は 1.0。
pub fn score(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    ratio(&a, &b)
}

/// 正規化なしの類似度
pub fn ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();

    if total == 0 {
        return 1.0;
    }

    let matched: usize = matching_blocks_chars(&a_chars, &b_chars)
        .iter()
        .map(|block| block.size)
        .sum();

    2.0 * matched as f64 / total as f64
}

/// 一致ブロックの一覧（`a` の位置順）
pub fn matching_blocks(a: &str, b: &str) -> Vec<MatchBlock> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    matching_blocks_chars(&a_chars, &b_chars)
}

fn matching_blocks_chars(a: &[char], b: &[char]) -> Vec<MatchBlock> {
    let b_index = index_positions(b);
    let mut blocks = Vec::new();

    // (alo, ahi, blo, bhi) の未処理区間
    let mut stack = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = stack.pop() {
        let block = find_longest_match(a, &b_index, alo, ahi, blo, bhi);
        if block.size == 0 {
            continue;
        }

        if alo < block.a && blo < block.b {
            stack.push((alo, block.a, blo, block.b));
        }
        let a_end = block.a + block.size;
        let b_end = block.b + block.size;
        if a_end < ahi && b_end < bhi {
            stack.push((a_end, ahi, b_end, bhi));
        }

        blocks.push(block);
    }

    blocks.sort();
    blocks
}

/// 文字 → 出現位置（昇順）
fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        index.entry(c).or_default().push(j);
    }
    index
}

/// `a[alo..ahi]` と `b[blo..bhi]` の最長共通部分文字列
///
/// 同じ長さの候補が複数ある場合は `a` で最も早く始まるもの、
/// その中で `b` で最も早く始まるものを返す。
fn find_longest_match(
    a: &[char],
    b_index: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchBlock {
    let mut best = MatchBlock { a: alo, b: blo, size: 0 };

    // j2len[j] = a[..i] と b[..=j] の末尾共通長
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();

        if let Some(positions) = b_index.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }

                let k = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next.insert(j, k);

                if k > best.size {
                    best = MatchBlock {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }

        j2len = next;
    }

    best
}
