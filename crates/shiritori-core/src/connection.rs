//! Which head kana may follow a given last kana.
//!
//! A kana always connects to itself. On top of that, voiced and semi-voiced
//! kana may be followed by their unvoiced form, and small kana by their
//! full-size form. The relation is deliberately one-way: ガ accepts カ but
//! カ does not accept ガ.

use crate::kana::Kana;

/// Additional heads accepted after `prev_last`, besides `prev_last` itself.
pub fn successors(prev_last: Kana) -> &'static [char] {
    match prev_last.as_char() {
        'ァ' => &['ア'],
        'ィ' => &['イ'],
        'ゥ' => &['ウ'],
        'ェ' => &['エ'],
        'ォ' => &['オ'],
        'ガ' => &['カ'],
        'ギ' => &['キ'],
        'グ' => &['ク'],
        'ゲ' => &['ケ'],
        'ゴ' => &['コ'],
        'ザ' => &['サ'],
        'ジ' => &['シ'],
        'ズ' => &['ス'],
        'ゼ' => &['セ'],
        'ゾ' => &['ソ'],
        'ダ' => &['タ'],
        'ヂ' => &['チ'],
        'ッ' => &['ツ'],
        'ヅ' => &['ツ'],
        'デ' => &['テ'],
        'ド' => &['ト'],
        'バ' | 'パ' => &['ハ'],
        'ビ' | 'ピ' => &['ヒ'],
        'ブ' | 'プ' => &['フ'],
        'ベ' | 'ペ' => &['ヘ'],
        'ボ' | 'ポ' => &['ホ'],
        'ャ' => &['ヤ'],
        'ュ' => &['ユ'],
        'ョ' => &['ヨ'],
        'ヮ' => &['ワ'],
        'ヰ' => &['イ'],
        'ヱ' => &['エ'],
        'ヲ' => &['オ'],
        'ヴ' => &['ウ', 'ブ'],
        'ヵ' => &['カ'],
        'ヶ' => &['ケ'],
        _ => &[],
    }
}

/// Whether a post whose reading starts with `curr_head` chains from one
/// that ended with `prev_last`.
pub fn is_connected(prev_last: Kana, curr_head: Kana) -> bool {
    prev_last == curr_head || successors(prev_last).contains(&curr_head.as_char())
}
