//! The skipped L1 message bitmap.
//!
//! The bitmap is a sequence of 32 bytes big endian words. The L1 message at position `i` in the
//! batch is tracked by the bit `i % 256` of the word `i / 256`, counted from the least
//! significant bit. A set bit marks the message as skipped.

use crate::{
    decoding::constants::{
        SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS, SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE,
    },
    BitmapError, BlockContext,
};

use alloy_primitives::{Bytes, U256};

/// A bitmap marking the L1 messages skipped by a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, derive_more::From, derive_more::Deref)]
pub struct SkipBitmap(Bytes);

impl From<Vec<u8>> for SkipBitmap {
    fn from(value: Vec<u8>) -> Self {
        Self(value.into())
    }
}

impl SkipBitmap {
    /// Returns the bitmap length in bytes required to cover `messages` L1 messages.
    pub fn expected_len(messages: u64) -> usize {
        messages.div_ceil(SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS) as usize *
            SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE
    }

    /// Returns a bitmap covering `messages` L1 messages where the messages at the provided
    /// positions are skipped. Positions outside of the covered range are ignored.
    pub fn from_skipped(messages: u64, skipped: impl IntoIterator<Item = u64>) -> Self {
        let mut bytes = vec![0u8; Self::expected_len(messages)];
        for position in skipped.into_iter().filter(|p| *p < messages) {
            let (byte, mask) = Self::locate(position);
            bytes[byte] |= mask;
        }
        bytes.into()
    }

    /// Returns the bitmap from its words, each word covering 256 L1 messages.
    pub fn from_words(words: impl IntoIterator<Item = U256>) -> Self {
        words.into_iter().flat_map(|word| word.to_be_bytes::<32>()).collect::<Vec<_>>().into()
    }

    /// Checks the bitmap length covers exactly `messages` L1 messages.
    pub fn check_len(&self, messages: u64) -> Result<(), BitmapError> {
        let expected = Self::expected_len(messages);
        if self.len() != expected {
            return Err(BitmapError::IncorrectBitmapLength { expected, got: self.len() })
        }
        Ok(())
    }

    /// Returns the number of L1 message slots covered by the bitmap.
    pub fn capacity(&self) -> u64 {
        (self.len() as u64) * 8
    }

    /// Returns true if the L1 message at the provided position in the batch is skipped.
    /// Positions outside of the bitmap are not skipped.
    pub fn is_skipped(&self, position: u64) -> bool {
        if position >= self.capacity() {
            return false
        }
        let (byte, mask) = Self::locate(position);
        self.0[byte] & mask != 0
    }

    /// Returns the word covering the L1 messages from `index * 256`.
    pub fn word(&self, index: usize) -> Option<U256> {
        let start = index * SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE;
        self.0
            .get(start..start + SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE)
            .map(U256::from_be_slice)
    }

    /// Returns a cursor positioned on the first L1 message of the batch.
    pub const fn cursor(&self) -> BitCursor<'_> {
        BitCursor { bitmap: self, position: 0 }
    }

    /// Returns the bitmap bytes.
    pub const fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Returns the byte offset and the bit mask of the provided position.
    const fn locate(position: u64) -> (usize, u8) {
        let word = (position / SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS) as usize;
        let bit = (position % SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS) as usize;
        let byte = word * SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE +
            SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE -
            1 -
            bit / 8;
        (byte, 1 << (bit % 8))
    }
}

/// A cursor over the L1 message slots of a [`SkipBitmap`], yielding whether each slot is
/// skipped.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    bitmap: &'a SkipBitmap,
    position: u64,
}

impl BitCursor<'_> {
    /// Returns the offset of the cursor in the batch.
    pub const fn offset(&self) -> u64 {
        self.position
    }

    /// Returns true if the slot `offset` positions ahead of the cursor is skipped.
    pub fn peek(&self, offset: u64) -> bool {
        self.bitmap.is_skipped(self.position + offset)
    }

    /// Advances the cursor by `count` slots.
    pub fn advance(&mut self, count: u64) {
        self.position += count;
    }
}

impl Iterator for BitCursor<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.bitmap.capacity() {
            return None
        }
        let skipped = self.bitmap.is_skipped(self.position);
        self.position += 1;
        Some(skipped)
    }
}

/// Validates the skipped L1 message bitmap against the blocks of a batch and returns the number
/// of L1 messages popped by the batch.
///
/// The checks are applied in order:
/// 1. each block has at least as many transactions as L1 messages, independently of the bitmap.
/// 2. the bitmap covers exactly the L1 messages of the blocks.
/// 3. the last L1 message of each block carrying L1 messages is not skipped.
pub fn validate_skip_bitmap<'a, I>(blocks: I, bitmap: &SkipBitmap) -> Result<u64, BitmapError>
where
    I: IntoIterator<Item = &'a BlockContext>,
    I::IntoIter: Clone,
{
    let blocks = blocks.into_iter();

    let mut total_l1_messages = 0u64;
    for (block, context) in blocks.clone().enumerate() {
        if context.num_l1_messages > context.num_transactions {
            return Err(BitmapError::NumTxsLessThanNumL1Msgs {
                block,
                num_transactions: context.num_transactions,
                num_l1_messages: context.num_l1_messages,
            })
        }
        total_l1_messages += context.num_l1_messages as u64;
    }

    bitmap.check_len(total_l1_messages)?;

    let mut cursor = bitmap.cursor();
    for context in blocks {
        let count = context.num_l1_messages as u64;
        if count > 0 && cursor.peek(count - 1) {
            return Err(BitmapError::LastL1MessageSkipped(cursor.offset() + count - 1))
        }
        cursor.advance(count);
    }

    Ok(total_l1_messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contexts(counts: &[(u16, u16)]) -> Vec<BlockContext> {
        counts.iter().map(|(txs, l1)| BlockContext::with_counts(*txs, *l1)).collect()
    }

    #[test]
    fn test_should_locate_bits_from_lsb_of_each_word() {
        let bitmap = SkipBitmap::from_skipped(300, [0, 9, 256]);
        assert_eq!(bitmap.len(), 64);
        assert_eq!(bitmap[31], 0b0000_0001);
        assert_eq!(bitmap[30], 0b0000_0010);
        assert_eq!(bitmap[63], 0b0000_0001);

        assert_eq!(bitmap.word(0), Some(U256::from(0b10_0000_0001u64)));
        assert_eq!(bitmap.word(1), Some(U256::from(1u64)));
        assert_eq!(bitmap.word(2), None);

        let skipped: Vec<_> =
            bitmap.cursor().enumerate().filter(|(_, s)| *s).map(|(i, _)| i).collect();
        assert_eq!(skipped, vec![0, 9, 256]);
        assert_eq!(SkipBitmap::from_words([U256::from(0b10_0000_0001u64), U256::from(1)]), bitmap);
    }

    fn advance_and_peek(cursor: &mut BitCursor<'_>, count: u64) -> (u64, bool) {
        cursor.advance(count);
        (cursor.offset(), cursor.peek(0))
    }

    #[test]
    fn test_should_track_cursor_offset_through_mutable_borrow() {
        let bitmap = SkipBitmap::from_skipped(300, [3, 260]);
        let mut cursor = bitmap.cursor();

        assert_eq!(advance_and_peek(&mut cursor, 3), (3, true));
        assert_eq!(advance_and_peek(&mut cursor, 1), (4, false));
        assert_eq!(advance_and_peek(&mut cursor, 256), (260, true));

        // iterating moves the cursor as well.
        assert_eq!(cursor.next(), Some(true));
        assert_eq!(cursor.offset(), 261);
    }

    #[test]
    fn test_should_validate_bitmap() -> eyre::Result<()> {
        let blocks = contexts(&[(3, 2), (0, 0), (1, 1)]);

        // no skip.
        assert_eq!(validate_skip_bitmap(&blocks, &SkipBitmap::from_skipped(3, []))?, 3);

        // skipping the first message of a block is allowed.
        assert_eq!(validate_skip_bitmap(&blocks, &SkipBitmap::from_skipped(3, [0]))?, 3);

        // no L1 messages, no bitmap.
        assert_eq!(validate_skip_bitmap(&contexts(&[(4, 0)]), &SkipBitmap::default())?, 0);

        Ok(())
    }

    #[test]
    fn test_should_reject_skipped_last_message() {
        let blocks = contexts(&[(1, 1)]);
        assert_eq!(
            validate_skip_bitmap(&blocks, &SkipBitmap::from_skipped(1, [0])),
            Err(BitmapError::LastL1MessageSkipped(0))
        );

        let blocks = contexts(&[(3, 2), (0, 0), (5, 3)]);
        assert_eq!(
            validate_skip_bitmap(&blocks, &SkipBitmap::from_skipped(5, [1])),
            Err(BitmapError::LastL1MessageSkipped(1))
        );
        assert_eq!(
            validate_skip_bitmap(&blocks, &SkipBitmap::from_skipped(5, [2, 3, 4])),
            Err(BitmapError::LastL1MessageSkipped(4))
        );
    }

    #[test]
    fn test_should_reject_more_l1_messages_than_transactions() {
        let blocks = contexts(&[(2, 2), (1, 3)]);
        let expected = Err(BitmapError::NumTxsLessThanNumL1Msgs {
            block: 1,
            num_transactions: 1,
            num_l1_messages: 3,
        });

        // the outcome doesn't depend on the bitmap.
        assert_eq!(validate_skip_bitmap(&blocks, &SkipBitmap::default()), expected);
        assert_eq!(validate_skip_bitmap(&blocks, &SkipBitmap::from_skipped(5, [4])), expected);
        assert_eq!(validate_skip_bitmap(&blocks, &vec![0xff; 7].into()), expected);
    }

    #[test]
    fn test_should_reject_incorrect_bitmap_length() {
        let blocks = contexts(&[(1, 1)]);
        assert_eq!(
            validate_skip_bitmap(&blocks, &SkipBitmap::default()),
            Err(BitmapError::IncorrectBitmapLength { expected: 32, got: 0 })
        );
        assert_eq!(
            validate_skip_bitmap(&blocks, &vec![0; 1].into()),
            Err(BitmapError::IncorrectBitmapLength { expected: 32, got: 1 })
        );

        let blocks = contexts(&[(1, 0)]);
        assert_eq!(
            validate_skip_bitmap(&blocks, &vec![0; 32].into()),
            Err(BitmapError::IncorrectBitmapLength { expected: 0, got: 32 })
        );
    }
}
