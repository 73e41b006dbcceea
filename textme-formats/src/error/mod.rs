/*!
 This module contains types of errors that can happen when converting message
 backups
*/

pub mod android;
pub mod win10;
