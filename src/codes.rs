// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Named byte/char constants for the C0 control set and the CSI/ESC final bytes this
//! core recognises, so [`crate::parser`] reads as VT100 mnemonics rather than bare
//! literals.

// C0 control bytes, dispatched through `vte::Perform::execute`.
pub const BACKSPACE: u8 = 0x08;
pub const TAB: u8 = 0x09;
pub const LINE_FEED: u8 = 0x0A;
pub const VERTICAL_TAB: u8 = 0x0B;
pub const CARRIAGE_RETURN: u8 = 0x0D;
pub const SHIFT_OUT: u8 = 0x0E;
pub const SHIFT_IN: u8 = 0x0F;
pub const BELL: u8 = 0x07;

// CSI final bytes.
pub const CUU_CURSOR_UP: char = 'A';
pub const CUD_CURSOR_DOWN: char = 'B';
pub const CUF_CURSOR_FORWARD: char = 'C';
pub const CUB_CURSOR_BACKWARD: char = 'D';
pub const CUP_CURSOR_POSITION: char = 'H';
pub const HVP_CURSOR_POSITION: char = 'f';
pub const ED_ERASE_DISPLAY: char = 'J';
pub const EL_ERASE_LINE: char = 'K';
pub const IL_INSERT_LINE: char = 'L';
pub const DL_DELETE_LINE: char = 'M';
pub const DCH_DELETE_CHAR: char = 'P';
pub const ICH_INSERT_CHAR: char = '@';
pub const DECSTBM_SET_MARGINS: char = 'r';
pub const SGR_SET_GRAPHICS: char = 'm';
pub const SM_SET_MODE: char = 'h';
pub const RM_RESET_MODE: char = 'l';
pub const SCP_SAVE_CURSOR: char = 's';
pub const RCP_RESTORE_CURSOR: char = 'u';
pub const TBC_TAB_CLEAR: char = 'g';

// ESC final bytes (no CSI introducer).
pub const IND_INDEX: char = 'D';
pub const RI_REVERSE_INDEX: char = 'M';
pub const NEL_NEXT_LINE: char = 'E';
pub const DECSC_SAVE_CURSOR: char = '7';
pub const DECRC_RESTORE_CURSOR: char = '8';
pub const RIS_RESET: char = 'c';
pub const HTS_TAB_SET: char = 'H';

// ESC intermediate bytes that introduce a G0-G3 charset designation.
pub const DESIGNATE_G0: u8 = b'(';
pub const DESIGNATE_G1: u8 = b')';
pub const DESIGNATE_G2: u8 = b'*';
pub const DESIGNATE_G3: u8 = b'+';

// Charset designation final bytes.
pub const CHARSET_ASCII: char = 'B';
pub const CHARSET_DEC_SPECIAL_GRAPHICS: char = '0';
pub const CHARSET_UK: char = 'A';

// DEC private mode prefix, and the mode numbers this core acts on.
pub const PRIVATE_MODE_PREFIX: u8 = b'?';
pub const DECAWM_AUTO_WRAP: u16 = 7;
pub const DECOM_ORIGIN_MODE: u16 = 6;
pub const IRM_INSERT_MODE_ANSI: u16 = 4;
pub const LNM_LINEFEED_NEWLINE: u16 = 20;
pub const DECSCNM_ALT_SCREEN: u16 = 1049;
pub const DECSCNM_ALT_SCREEN_47: u16 = 47;
pub const DECSCNM_ALT_SCREEN_1047: u16 = 1047;
