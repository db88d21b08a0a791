// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

pub mod time;
